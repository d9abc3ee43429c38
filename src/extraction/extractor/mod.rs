use std::collections::HashMap;

use scraper::Html;

use super::types::Extraction;

mod erome;
mod imagepond;

/// Sites we know how to read. Each variant owns the layout rules for one host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site { Erome, ImagePond }

impl Site {
    pub fn name(&self) -> &'static str {
        match self {
            Site::Erome => "erome",
            Site::ImagePond => "imagepond",
        }
    }

    pub fn from_name(name: &str) -> Option<Site> {
        match name.trim().to_ascii_lowercase().as_str() {
            "erome" => Some(Site::Erome),
            "imagepond" => Some(Site::ImagePond),
            _ => None,
        }
    }

    pub fn extract(&self, doc: &Html) -> Extraction {
        match self {
            Site::Erome => erome::extract(doc),
            Site::ImagePond => imagepond::extract(doc),
        }
    }
}

/// Hostname -> site table. Built once, then only read.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: HashMap<String, Site>,
}

impl Registry {
    pub fn builtin() -> Self {
        let entries = [
            ("www.erome.com", Site::Erome),
            ("www.imagepond.net", Site::ImagePond),
        ];
        Registry { entries: entries.into_iter().map(|(h, s)| (h.to_string(), s)).collect() }
    }

    /// Extra host served by an existing extractor (mirrors, local fixtures).
    pub fn with_host(mut self, host: impl Into<String>, site: Site) -> Self {
        self.entries.insert(host.into(), site);
        self
    }

    pub fn lookup(&self, host: &str) -> Option<Site> { self.entries.get(host).copied() }

    pub fn hosts(&self) -> Vec<(&str, Site)> {
        let mut out: Vec<(&str, Site)> = self.entries.iter().map(|(h, s)| (h.as_str(), *s)).collect();
        out.sort_by(|a, b| a.0.cmp(b.0));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_hosts_resolve() {
        let reg = Registry::builtin();
        assert_eq!(reg.lookup("www.erome.com"), Some(Site::Erome));
        assert_eq!(reg.lookup("www.imagepond.net"), Some(Site::ImagePond));
    }

    #[test]
    fn lookup_is_exact_match() {
        let reg = Registry::builtin();
        assert_eq!(reg.lookup("erome.com"), None);
        assert_eq!(reg.lookup("WWW.EROME.COM"), None);
        assert_eq!(reg.lookup("unknown.example"), None);
    }

    #[test]
    fn site_names_round_trip() {
        for site in [Site::Erome, Site::ImagePond] { assert_eq!(Site::from_name(site.name()), Some(site)); }
        assert_eq!(Site::from_name(" ImagePond "), Some(Site::ImagePond));
        assert_eq!(Site::from_name("flickr"), None);
    }

    #[test]
    fn with_host_adds_entry() {
        let reg = Registry::builtin().with_host("127.0.0.1", Site::ImagePond);
        assert_eq!(reg.lookup("127.0.0.1"), Some(Site::ImagePond));
        let hosts: Vec<&str> = reg.hosts().into_iter().map(|(h, _)| h).collect();
        assert_eq!(hosts, vec!["127.0.0.1", "www.erome.com", "www.imagepond.net"]);
    }
}
