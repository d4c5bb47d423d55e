//! Mass/volume bridging through an ingredient density.

mod common;

use common::{amount, assert_close, GramBase, Seeded};
use thucdon_core::{
    Amount, ConversionConfig, ConversionError, ConversionSource, ErrorKind, MemoryStore,
    UnitConversionService,
};
use std::sync::Arc;

#[tokio::test]
async fn test_cooking_oil_grams_to_millilitres() {
    let f = GramBase::new();
    let oil = amount("0.92");

    let converted = f
        .service
        .convert_with_density(Amount::from(15), f.g, f.ml, oil)
        .await
        .unwrap();
    assert_eq!(converted.value.round_dp(2), amount("16.30"));
    assert_eq!(converted.source, ConversionSource::Density);
    assert_eq!(converted.path, vec![f.g, f.ml]);
}

#[tokio::test]
async fn test_volume_to_mass_multiplies() {
    let f = GramBase::new();

    let converted = f
        .service
        .convert_with_density(Amount::from(100), f.ml, f.g, amount("0.92"))
        .await
        .unwrap();
    assert_eq!(converted.value, Amount::from(92));
}

#[tokio::test]
async fn test_bridge_expands_to_non_anchor_units() {
    let f = GramBase::new();

    // 2 kg of water is 2 l
    let converted = f
        .service
        .convert_with_density(Amount::from(2), f.kg, f.l, Amount::ONE)
        .await
        .unwrap();
    assert_eq!(converted.value, Amount::from(2));
    assert_eq!(converted.path, vec![f.kg, f.g, f.ml, f.l]);
}

#[tokio::test]
async fn test_bridge_round_trip() {
    let f = GramBase::new();
    let honey = amount("1.42");

    let volume = f
        .service
        .convert_with_density(Amount::from(3), f.oz, f.ml, honey)
        .await
        .unwrap();
    let mass = f
        .service
        .convert_with_density(volume.value, f.ml, f.oz, honey)
        .await
        .unwrap();
    assert_close(mass.value, Amount::from(3), "0.000000001");
}

#[tokio::test]
async fn test_seeded_fish_sauce() {
    let seeded = Seeded::new();
    let thia = seeded.unit("thìa").await;
    let g = seeded.unit("g").await;
    let kg = seeded.unit("kg").await;
    let fish_sauce = Amount::new(unit_catalog::find_density("nước mắm").unwrap());

    // One tablespoon is 15 ml
    let grams = seeded
        .service
        .convert_with_density(Amount::ONE, thia, g, fish_sauce)
        .await
        .unwrap();
    assert_eq!(grams.value, Amount::from(18));

    let kilos = seeded
        .service
        .convert_with_density(Amount::ONE, thia, kg, fish_sauce)
        .await
        .unwrap();
    assert_eq!(kilos.value, amount("0.018"));
}

#[tokio::test]
async fn test_invalid_pairs() {
    let f = GramBase::new();
    let density = Amount::ONE;

    let err = f
        .service
        .convert_with_density(Amount::ONE, f.g, f.kg, density)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidDensityPair);

    let err = f
        .service
        .convert_with_density(Amount::ONE, f.piece, f.g, density)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidDensityPair);
    assert!(err.to_string().contains("count"));
}

#[tokio::test]
async fn test_density_must_be_positive() {
    let f = GramBase::new();

    for density in [Amount::ZERO, Amount::from(-1)] {
        let err = f
            .service
            .convert_with_density(Amount::ONE, f.g, f.ml, density)
            .await
            .unwrap_err();
        assert!(matches!(err, ConversionError::InvalidDensity(_)));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}

#[tokio::test]
async fn test_missing_anchor() {
    let store = Arc::new(MemoryStore::new());
    let mass = store.add_category("mass");
    let volume = store.add_category("volume");
    let gram = store.add_unit("gram", mass, true, Amount::ONE);
    let ml = store.add_unit("ml", volume, true, Amount::ONE);

    let service = UnitConversionService::new(store.clone());
    let err = service
        .convert_with_density(Amount::ONE, gram, ml, Amount::ONE)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ConversionError::AnchorUnitMissing {
            symbol: "g".to_string()
        }
    );

    let config = ConversionConfig {
        mass_anchor: "gram".to_string(),
        ..ConversionConfig::default()
    };
    let service = UnitConversionService::with_config(store, config);
    let converted = service
        .convert_with_density(Amount::from(5), gram, ml, Amount::ONE)
        .await
        .unwrap();
    assert_eq!(converted.value, Amount::from(5));
}

#[tokio::test]
async fn test_density_fallback() {
    let f = GramBase::new();
    let oil = Some(amount("0.92"));

    let bridged = f
        .service
        .convert_with_density_fallback(Amount::from(92), f.g, f.ml, oil)
        .await
        .unwrap();
    assert_eq!(bridged.value, Amount::from(100));
    assert_eq!(bridged.source, ConversionSource::Density);

    // Same category never touches the density
    let plain = f
        .service
        .convert_with_density_fallback(Amount::from(1000), f.g, f.kg, oil)
        .await
        .unwrap();
    assert_eq!(plain.value, Amount::ONE);
    assert_eq!(plain.source, ConversionSource::BasePath);

    let err = f
        .service
        .convert_with_density_fallback(Amount::from(92), f.g, f.ml, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CategoryMismatch);
}
