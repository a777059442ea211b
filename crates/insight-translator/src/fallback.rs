use url::Url;

const GOOGLE_TRANSLATE: &str = "https://translate.google.com/";

/// Google Translate page for a word nobody could translate
pub fn fallback_url(word: &str, from: &str, to: &str) -> Url {
    let mut url = Url::parse(GOOGLE_TRANSLATE).expect("static url parses");
    url.query_pairs_mut()
        .append_pair("sl", from)
        .append_pair("tl", to)
        .append_pair("text", word.trim())
        .append_pair("op", "translate");
    url
}
