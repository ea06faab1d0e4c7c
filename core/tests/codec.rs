//! Shared-link codec — encode, decode, validation and coercion.

use fate_core::{
    archetype::Archetype,
    catalog::Catalog,
    codec::{self, SessionResult},
    compatibility::Compatibility,
    error::LinkError,
};

fn catalog() -> Catalog {
    Catalog::builtin().expect("builtin catalog")
}

fn result(archetype: Archetype, tenths: u16, candidate_id: &str) -> SessionResult {
    SessionResult {
        archetype,
        compatibility: Compatibility::from_tenths(tenths),
        candidate_id: candidate_id.into(),
    }
}

#[test]
fn encode_sets_three_params() {
    let r = result(Archetype::Blueprint, 974, "blueprint-eleven-mike");
    assert_eq!(codec::encode(&r), "a=blueprint&c=blueprint-eleven-mike&p=97.4");
}

#[test]
fn every_catalog_candidate_round_trips() {
    let catalog = catalog();
    for (i, candidate) in catalog.candidates.iter().enumerate() {
        let r = result(candidate.archetype, 660 + (i as u16 * 37) % 340, &candidate.id);
        let decoded = codec::decode(&codec::encode(&r), &catalog).expect("valid link");
        assert_eq!(decoded, r);
        // Decoding is idempotent.
        assert_eq!(codec::decode(&codec::encode(&decoded), &catalog).unwrap(), decoded);
    }
}

#[test]
fn decodes_full_urls_in_any_param_order() {
    let decoded = codec::decode(
        "https://fictional-fate.app/?utm=x&p=88.8&c=radiant-peter-mj&a=radiant#share",
        &catalog(),
    )
    .unwrap();
    assert_eq!(decoded, result(Archetype::Radiant, 888, "radiant-peter-mj"));
}

#[test]
fn missing_candidate_is_rejected() {
    assert_eq!(
        codec::decode("?a=obsidian&p=90.0", &catalog()),
        Err(LinkError::MissingParam("c"))
    );
}

#[test]
fn any_missing_param_is_rejected() {
    let catalog = catalog();
    for query in [
        "c=obsidian-wednesday-enid&p=90.0",
        "a=obsidian&p=90.0",
        "a=obsidian&c=obsidian-wednesday-enid",
        "",
    ] {
        assert!(
            matches!(codec::decode(query, &catalog), Err(LinkError::MissingParam(_))),
            "{query:?} should be missing a param"
        );
    }
}

#[test]
fn unknown_archetype_is_rejected() {
    assert_eq!(
        codec::decode("a=invalid-key&c=obsidian-wednesday-enid&p=90.0", &catalog()),
        Err(LinkError::UnknownArchetype("invalid-key".into()))
    );
}

#[test]
fn unknown_candidate_is_rejected() {
    assert_eq!(
        codec::decode("a=obsidian&c=nobody-and-no-one&p=90.0", &catalog()),
        Err(LinkError::UnknownCandidate("nobody-and-no-one".into()))
    );
}

#[test]
fn non_numeric_compatibility_is_rejected() {
    assert_eq!(
        codec::decode("a=obsidian&c=obsidian-wednesday-enid&p=lots", &catalog()),
        Err(LinkError::InvalidCompatibility("lots".into()))
    );
    assert!(codec::decode("a=obsidian&c=obsidian-wednesday-enid&p=", &catalog()).is_err());
}

#[test]
fn out_of_range_compatibility_is_coerced() {
    let catalog = catalog();
    let high = codec::decode("a=kinetic&c=kinetic-april-andy&p=140", &catalog).unwrap();
    assert_eq!(high.compatibility.to_string(), "99.9");

    let low = codec::decode("a=kinetic&c=kinetic-april-andy&p=-20", &catalog).unwrap();
    assert_eq!(low.compatibility.to_string(), "0.0");

    let long = codec::decode("a=kinetic&c=kinetic-april-andy&p=91.26", &catalog).unwrap();
    assert_eq!(long.compatibility.to_string(), "91.3");
}

#[test]
fn candidate_from_another_archetype_is_kept_as_is() {
    // Only existence is checked; the fallback selection rule can pair an
    // archetype with another archetype's candidate.
    let decoded = codec::decode("a=radiant&c=kinetic-april-andy&p=80.0", &catalog()).unwrap();
    assert_eq!(decoded, result(Archetype::Radiant, 800, "kinetic-april-andy"));
}

#[test]
fn inputs_with_extra_decimals_round_like_fixed_point_display() {
    let catalog = catalog();
    let decode_p = |p: &str| {
        codec::decode(&format!("a=kinetic&c=kinetic-april-andy&p={p}"), &catalog)
            .unwrap()
            .compatibility
            .to_string()
    };
    // 1.45 is stored as 1.4499999..., so it rounds down.
    assert_eq!(decode_p("1.45"), "1.4");
    // Exact binary halves round up.
    assert_eq!(decode_p("0.25"), "0.3");
    assert_eq!(decode_p("2.75"), "2.8");
}

#[test]
fn share_link_decodes_back_to_the_result() {
    let catalog = catalog();
    let r = result(Archetype::Sentimental, 931, "sentimental-katniss-peeta");
    let link = codec::share_link("https://fictional-fate.app/", &r);
    assert_eq!(link, "https://fictional-fate.app/?a=sentimental&c=sentimental-katniss-peeta&p=93.1");
    assert_eq!(codec::decode(&link, &catalog).unwrap(), r);
}

#[test]
fn share_message_names_the_archetype_label() {
    let r = result(Archetype::Obsidian, 905, "obsidian-anthony-kate");
    let msg = codec::share_message(&r, "https://x.test/?a=obsidian");
    assert_eq!(
        msg,
        "My canon event:\nArchetype: Obsidian Introvert\nCompatibility: 90.5%\nhttps://x.test/?a=obsidian\n"
    );
}
