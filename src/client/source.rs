use std::future::Future;
use std::marker::PhantomData;

use super::ProxyClient;
use crate::error::Error;
use crate::types::{Coord, School, Station};

/// An item a selector can list and select.
pub trait Suggestion: Clone + Send + Sync + 'static {
    /// Inline message when a search fails without a server-provided one.
    const FAILURE: &'static str;

    /// Stable identity.
    fn key(&self) -> &str;
    /// Text shown in the list and filled into the input on selection.
    fn label(&self) -> &str;
    /// Secondary line (usually the address).
    fn detail(&self) -> Option<&str>;
}

impl Suggestion for Station {
    const FAILURE: &'static str = "failed to search stations";

    fn key(&self) -> &str {
        self.id.as_str()
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn detail(&self) -> Option<&str> {
        self.address_name.as_deref()
    }
}

impl Suggestion for School {
    const FAILURE: &'static str = "failed to search schools";

    fn key(&self) -> &str {
        &self.code
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn detail(&self) -> Option<&str> {
        Some(&self.address)
    }
}

/// Where a selector gets its suggestions from.
pub trait SuggestionSource: Send + Sync + 'static {
    type Item: Suggestion;

    fn search(&self, word: &str) -> impl Future<Output = Result<Vec<Self::Item>, Error>> + Send;
}

/// Suggestions from this server's proxy endpoints.
#[derive(Debug, Clone)]
pub struct ProxySource<T> {
    client: ProxyClient,
    _item: PhantomData<fn() -> T>,
}

impl<T> ProxySource<T> {
    #[must_use]
    pub fn new(client: ProxyClient) -> Self {
        Self {
            client,
            _item: PhantomData,
        }
    }
}

impl SuggestionSource for ProxySource<Station> {
    type Item = Station;

    fn search(&self, word: &str) -> impl Future<Output = Result<Vec<Station>, Error>> + Send {
        let client = self.client.clone();
        let word = word.to_string();
        async move { client.search_stations(&word).await }
    }
}

impl SuggestionSource for ProxySource<School> {
    type Item = School;

    fn search(&self, word: &str) -> impl Future<Output = Result<Vec<School>, Error>> + Send {
        let client = self.client.clone();
        let word = word.to_string();
        async move { client.search_schools(&word).await }
    }
}

/// Fixed destination catalog, filtered locally by name or address.
#[derive(Debug, Clone)]
pub struct PresetSource {
    destinations: Vec<School>,
}

impl PresetSource {
    #[must_use]
    pub fn new(destinations: Vec<School>) -> Self {
        Self { destinations }
    }

    #[must_use]
    pub fn destinations(&self) -> &[School] {
        &self.destinations
    }

    /// Destination by its code.
    #[must_use]
    pub fn find(&self, code: &str) -> Option<&School> {
        self.destinations.iter().find(|d| d.code == code)
    }

    fn matching(&self, word: &str) -> Vec<School> {
        self.destinations
            .iter()
            .filter(|d| d.name.contains(word) || d.address.contains(word))
            .cloned()
            .collect()
    }
}

impl Default for PresetSource {
    fn default() -> Self {
        Self::new(preset_destinations())
    }
}

impl SuggestionSource for PresetSource {
    type Item = School;

    fn search(&self, word: &str) -> impl Future<Output = Result<Vec<School>, Error>> + Send {
        std::future::ready(Ok(self.matching(word)))
    }
}

/// Destinations offered when no school search is available.
#[must_use]
pub fn preset_destinations() -> Vec<School> {
    [
        ("tennoji-station", "天王寺駅", "大阪府大阪市天王寺区悲田院町", 34.647828, 135.513256),
        ("abeno-station", "阿倍野駅", "大阪府大阪市阿倍野区阿倍野筋一丁目", 34.6372, 135.5142),
        ("showacho-station", "昭和町駅", "大阪府大阪市阿倍野区昭和町一丁目", 34.633506, 135.516949),
        ("seifu-college", "清風情報工科学院", "大阪府大阪市阿倍野区丸山通1丁目6-3", 34.636468, 135.509725),
    ]
    .into_iter()
    .map(|(code, name, address, lat, lon)| School {
        code: code.into(),
        name: name.into(),
        address: address.into(),
        coord: Coord { lat, lon },
        phone: None,
        categories: None,
    })
    .collect()
}
