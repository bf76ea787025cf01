//! Shared helpers for serializer integration tests.

use wikivert::{Env, SerializeOptions};

/// Full serialization of an annotated HTML fragment.
pub fn full(html: &str) -> String {
    wikivert::html_to_wikitext(html, &Env::default()).expect("serialization should succeed")
}

/// Selective serialization against the given original source.
pub fn selser(html: &str, original: &str) -> String {
    let env = Env::new(SerializeOptions {
        selser: true,
        scrub_wikitext: false,
    })
    .with_page_src(original);
    wikivert::html_to_wikitext(html, &env).expect("selser should succeed")
}
