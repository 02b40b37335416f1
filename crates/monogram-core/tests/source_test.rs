use monogram_core::{
    AvatarConfig, AvatarGenerator, Capabilities, SVG_DATA_URI_PREFIX, decode_source, get_source,
    hash, initials,
};
use std::sync::Arc;

fn text_content(svg: &str) -> Option<String> {
    let doc = roxmltree::Document::parse(svg).expect("well-formed svg");
    assert_eq!(doc.root_element().tag_name().name(), "svg");
    doc.descendants()
        .find(|n| n.has_tag_name("text"))
        .and_then(|n| n.text().map(str::to_string))
}

#[test]
fn round_trip_yields_svg_with_initials() {
    for (name, expected) in [
        ("Karl Benson (KA)", "KA"),
        ("Karl Benson", "KB"),
        ("Madonna", "M"),
        ("Jørgen Ærø", "JÆ"),
    ] {
        let uri = get_source(name, Some(64), Some(64));
        assert!(uri.starts_with(SVG_DATA_URI_PREFIX));
        let svg = decode_source(&uri).expect("decodes");
        assert_eq!(text_content(&svg).as_deref(), Some(expected), "name={name}");
    }
}

#[test]
fn default_avatar_imports_the_embedded_font() {
    use base64::Engine as _;

    let svg = decode_source(&get_source("Karl Benson", None, None)).expect("decodes");
    let start = svg.find("data:text/css;base64,").expect("font stylesheet import");
    let rest = &svg[start + "data:text/css;base64,".len()..];
    let payload = &rest[..rest.find('&').expect("end of import url")];
    let css = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .expect("css payload");
    let css = String::from_utf8(css).expect("utf8 css");
    assert!(css.contains("font-family: \"Open Sans\";"));
    assert!(css.contains("data:font/woff;charset=utf-8;base64,"));
}

#[test]
fn global_source_is_memoized() {
    let a = get_source("Acme Corp", None, None);
    let b = get_source("Acme Corp", None, None);
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn blank_name_yields_a_valid_empty_avatar() {
    let svg = decode_source(&get_source("   ", None, None)).expect("decodes");
    assert_eq!(text_content(&svg), None);
    assert!(svg.contains(r#"width="44" height="44""#));
}

#[test]
fn identical_configs_produce_identical_bytes() {
    let a = AvatarGenerator::new(AvatarConfig::default(), Capabilities::default()).unwrap();
    let b = AvatarGenerator::default();
    assert_eq!(
        a.source("Karl Benson", Some(32), Some(32)),
        b.source("Karl Benson", Some(32), Some(32))
    );
}

#[test]
fn generator_is_shareable_across_threads() {
    let g = Arc::new(AvatarGenerator::default());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let g = Arc::clone(&g);
            std::thread::spawn(move || g.source(&format!("User {}", i % 2), Some(40), None))
        })
        .collect();
    let out: Vec<Arc<str>> = handles
        .into_iter()
        .map(|h| h.join().expect("thread"))
        .collect();
    assert_eq!(out[0], out[2]);
    assert_eq!(out[1], out[3]);
    assert_eq!(g.cache_len(), 2);
}

#[test]
fn config_file_resolves_relative_font_path() {
    let dir = std::env::temp_dir().join(format!("monogram-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("face.woff"), b"wOFFfake").unwrap();
    let cfg_path = dir.join("avatar.json");
    std::fs::write(&cfg_path, r#"{"fontFamily": "Face", "fontPath": "face.woff"}"#).unwrap();

    let cfg = AvatarConfig::from_path(&cfg_path).unwrap();
    assert_eq!(cfg.font_path.as_deref(), Some(dir.join("face.woff").as_path()));

    let g = AvatarGenerator::new(cfg, Capabilities::default()).unwrap();
    assert!(g.font().css().contains("data:font/woff;charset=utf-8;base64,"));
    assert!(g.svg("Karl", None, None).contains("&#39;Face&#39;, sans-serif"));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn hash_is_never_negative_and_initials_idempotent() {
    for s in ["", "a", "Karl Benson", "\u{FFFF}\u{FFFF}\u{FFFF}", "zzzzzzzzzzzzzzzzzzzz"] {
        for k in [3, 5, 7] {
            assert_eq!(hash(s, k), hash(s, k));
        }
        assert_eq!(initials(s), initials(s));
    }
}
