use lvx_core::{
    extract_document, pages_from_text, ExtractionError, LvExtractor, LvxConfig, MetadataExtractor,
    MetadataField, PositionExtractor,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

const DOCUMENT: &str = "\
Muster Bau GmbH -- Hauptstraße 1 -- 12345 Musterstadt Tel.: 0123 / 45678
Projekt: Neubau Kita Sonnenschein 12.03.2024 LV: Rohbau Seite: 1
Bauherr: Stadt Musterhausen
Bieter: Beispiel Tiefbau AG
Angebotssumme Netto: 2.565,00 €
Vorbemerkungen: Die Baustelle ist über die Nordzufahrt erreichbar.
AUSSCHREIBUNG
1 Erdarbeiten
1.1 Aushub Baugrube 10 m3 5,00 50,00
Bodenklasse 3-5
1.2 Verfüllen 5 m3 3,00 15,00
Übertrag: 65,00
\x0c\
Muster Bau GmbH -- Hauptstraße 1 -- 12345 Musterstadt Tel.: 0123 / 45678
Projekt: Neubau Kita Sonnenschein 12.03.2024 LV: Rohbau Seite: 2
Position Menge/Einheit EP (EUR) GP (EUR)
2 Mauerarbeiten
2.1 Mauerwerk Kalksandstein
Wanddicke 24 cm
100 m2 25,00 2.500,00
Summe 2 Mauerarbeiten 2.500,00
Schlussbemerkungen: Es gilt die VOB/B.
Ort, Datum
";

fn dec(s: &str) -> Option<Decimal> {
    Some(s.parse().unwrap())
}

#[test]
fn test_full_document() {
    let pages = pages_from_text(DOCUMENT);
    assert_eq!(pages.len(), 2);

    let extraction = extract_document(&pages, &LvxConfig::default()).unwrap();

    assert_eq!(extraction.metadata.project_name(), Some("Neubau Kita Sonnenschein"));
    assert_eq!(extraction.metadata.issue_date(), Some("12.03.2024"));
    assert_eq!(extraction.metadata.client(), Some("Stadt Musterhausen"));
    assert_eq!(
        extraction.metadata.amount(MetadataField::OfferNetTotal),
        dec("2565.00")
    );

    assert_eq!(extraction.header.company.as_deref(), Some("Muster Bau GmbH"));
    assert_eq!(extraction.header.lv.as_deref(), Some("Rohbau"));

    assert_eq!(
        extraction.sections.preliminary_remarks,
        "Die Baustelle ist über die Nordzufahrt erreichbar."
    );
    assert_eq!(extraction.sections.closing_remarks, "Es gilt die VOB/B.");

    let numbers: Vec<&str> = extraction
        .positions
        .iter()
        .map(|p| p.position_number.as_str())
        .collect();
    assert_eq!(numbers, vec!["1", "1.1", "1.2", "2", "2.1"]);

    let aushub = extraction.positions.get("1.1").unwrap();
    assert_eq!(aushub.description, "Aushub Baugrube Bodenklasse 3-5");
    assert_eq!(aushub.total_price, dec("50.00"));

    let mauerwerk = extraction.positions.get("2.1").unwrap();
    assert_eq!(mauerwerk.description, "Mauerwerk Kalksandstein Wanddicke 24 cm");
    assert_eq!(mauerwerk.quantity, dec("100"));
    assert_eq!(mauerwerk.unit.as_deref(), Some("m2"));
    assert_eq!(mauerwerk.total_price, dec("2500.00"));
    assert_eq!(mauerwerk.page, 2);

    assert_eq!(extraction.positions.total_price(), Some(Decimal::new(256500, 2)));
    assert!(extraction.positions.validate(Decimal::new(1, 2)).is_empty());
}

#[test]
fn test_extraction_serializes_all_metadata_keys() {
    let pages = pages_from_text(DOCUMENT);
    let extraction = extract_document(&pages, &LvxConfig::default()).unwrap();

    let json = serde_json::to_value(&extraction).unwrap();
    let metadata = json["metadata"].as_object().unwrap();

    assert_eq!(metadata.len(), MetadataField::ALL.len());
    assert!(metadata["execution_period"].is_null());
    assert_eq!(json["positions"][1]["position_number"], "1.1");
}

#[test]
fn test_extractors_reject_empty_input() {
    let config = LvxConfig::default();

    assert_eq!(
        MetadataExtractor::new(&config.metadata).try_extract(&[]),
        Err(ExtractionError::NoPages)
    );
    assert_eq!(
        PositionExtractor::new(&config.positions).unwrap().try_extract(&[]),
        Err(ExtractionError::NoPages)
    );
}
