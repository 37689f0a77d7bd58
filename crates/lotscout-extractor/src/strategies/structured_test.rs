use super::*;

#[test]
fn extracts_vehicle_and_dealer_from_one_document() {
    let html = r#"
        <html><head>
        <script type="application/ld+json">
        {
            "@context": "https://schema.org",
            "@type": "Car",
            "name": "2021 Honda Accord EX-L",
            "brand": {"@type": "Brand", "name": "Honda"},
            "model": "Accord",
            "vehicleConfiguration": "EX-L",
            "vehicleIdentificationNumber": "1HGCV1F56MA012345",
            "mileageFromOdometer": {"@type": "QuantitativeValue", "value": 32000},
            "image": "https://cdn.example.com/accord.jpg",
            "offers": {"@type": "Offer", "price": "24500.00", "priceCurrency": "USD"}
        }
        </script>
        <script type="application/ld+json">
        {
            "@type": "AutoDealer",
            "name": "Springfield Motors",
            "address": {
                "@type": "PostalAddress",
                "addressLocality": "Austin",
                "addressRegion": "TX",
                "postalCode": "78701-1234"
            }
        }
        </script>
        </head></html>
    "#;

    let out = extract(html);
    let get = |f| out.get(f).map(|c| c.value.clone());
    assert_eq!(get(ListingField::Price), Some(FieldValue::Number(24_500)));
    assert_eq!(get(ListingField::Year), Some(FieldValue::Number(2021)));
    assert_eq!(get(ListingField::Make), Some(FieldValue::Text("Honda".into())));
    assert_eq!(get(ListingField::Model), Some(FieldValue::Text("Accord".into())));
    assert_eq!(get(ListingField::Trim), Some(FieldValue::Text("EX-L".into())));
    assert_eq!(get(ListingField::Mileage), Some(FieldValue::Number(32_000)));
    assert_eq!(
        get(ListingField::Vin),
        Some(FieldValue::Text("1HGCV1F56MA012345".into()))
    );
    assert_eq!(
        get(ListingField::DealerName),
        Some(FieldValue::Text("Springfield Motors".into()))
    );
    assert_eq!(
        get(ListingField::DealerCity),
        Some(FieldValue::Text("Austin".into()))
    );
    assert_eq!(
        get(ListingField::DealerState),
        Some(FieldValue::Text("TX".into()))
    );
    assert_eq!(get(ListingField::Zip), Some(FieldValue::Text("78701".into())));
    assert!(out
        .candidates()
        .iter()
        .all(|c| c.confidence == Confidence::High));
}

#[test]
fn malformed_block_does_not_abort_later_blocks() {
    let html = r#"
        <script type="application/ld+json">{not json at all</script>
        <script type="application/ld+json">
        {"@type": "Vehicle", "name": "2019 Ford F-150", "brand": "Ford"}
        </script>
    "#;
    let out = extract(html);
    assert_eq!(
        out.get(ListingField::Make).map(|c| c.value.clone()),
        Some(FieldValue::Text("Ford".into()))
    );
    assert_eq!(
        out.get(ListingField::Year).map(|c| c.value.clone()),
        Some(FieldValue::Number(2019))
    );
    assert!(out
        .issues
        .iter()
        .any(|i| i.contains("failed to parse")));
}

#[test]
fn out_of_bounds_price_is_discarded_silently() {
    let html = r#"
        <script type="application/ld+json">
        {"@type": "Product", "name": "2020 Toyota Camry",
         "offers": {"price": 450000}}
        </script>
    "#;
    let out = extract(html);
    assert_eq!(out.get(ListingField::Price), None);
    // Year still comes through from the name.
    assert_eq!(
        out.get(ListingField::Year).map(|c| c.value.clone()),
        Some(FieldValue::Number(2020))
    );
}

#[test]
fn first_block_wins_in_document_order() {
    let html = r#"
        <script type="application/ld+json">
        {"@type": "Car", "name": "No year here", "offers": {"price": 18000}}
        </script>
        <script type="application/ld+json">
        {"@type": "Car", "name": "Also no year", "offers": {"price": 21000}}
        </script>
    "#;
    let out = extract(html);
    assert_eq!(
        out.get(ListingField::Price).map(|c| c.value.clone()),
        Some(FieldValue::Number(18_000))
    );
}

#[test]
fn graph_container_and_namespaced_types_are_accepted() {
    let html = r#"
        <script type="application/ld+json">
        {"@graph": [
            {"@type": "schema:Car", "name": "2022 Kia Telluride", "brand": "Kia"},
            {"@type": ["Organization", "AutoDealer"], "name": "Hill Country Kia",
             "address": {"addressLocality": "San Marcos", "addressRegion": "TX"}}
        ]}
        </script>
    "#;
    let out = extract(html);
    assert_eq!(
        out.get(ListingField::Make).map(|c| c.value.clone()),
        Some(FieldValue::Text("Kia".into()))
    );
    assert_eq!(
        out.get(ListingField::DealerName).map(|c| c.value.clone()),
        Some(FieldValue::Text("Hill Country Kia".into()))
    );
}

#[test]
fn invalid_vin_is_dropped() {
    let html = r#"
        <script type="application/ld+json">
        {"@type": "Car", "name": "x", "vehicleIdentificationNumber": "SHORTVIN"}
        </script>
    "#;
    let out = extract(html);
    assert_eq!(out.get(ListingField::Vin), None);
}

#[test]
fn article_typed_block_contributes_nothing() {
    let html = r#"
        <script type="application/ld+json">
        {"@type": "Article", "name": "2021 buying guide"}
        </script>
    "#;
    let out = extract(html);
    assert!(out.is_empty());
}
