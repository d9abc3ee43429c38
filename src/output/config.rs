use std::env;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OutputConfig {
    pub pretty: bool,
}

impl OutputConfig {
    pub fn from_env() -> Self {
        let pretty = match env::var("MSCRAPE_OUTPUT_PRETTY").ok().as_deref() {
            Some(v) => is_truthy(v),
            None => false,
        };
        OutputConfig { pretty }
    }
}

fn is_truthy(v: &str) -> bool {
    v.eq_ignore_ascii_case("1") || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes")
}
