//! City autocomplete catalog
//!
//! Entries are `"City (ST)"` strings. Ranking tiers, best first:
//! exact city name, city name prefix, substring anywhere in the entry.

/// Cities offered when no custom list is configured
const BUILTIN_CITIES: &[&str] = &[
    "Aracaju (SE)",
    "Belém (PA)",
    "Belo Horizonte (MG)",
    "Boa Vista (RR)",
    "Brasília (DF)",
    "Campinas (SP)",
    "Campo Grande (MS)",
    "Cuiabá (MT)",
    "Curitiba (PR)",
    "Florianópolis (SC)",
    "Fortaleza (CE)",
    "Goiânia (GO)",
    "Guarulhos (SP)",
    "João Pessoa (PB)",
    "Londrina (PR)",
    "Macapá (AP)",
    "Maceió (AL)",
    "Manaus (AM)",
    "Natal (RN)",
    "Niterói (RJ)",
    "Olinda (PE)",
    "Palmas (TO)",
    "Porto Alegre (RS)",
    "Porto Velho (RO)",
    "Recife (PE)",
    "Ribeirão Preto (SP)",
    "Rio Branco (AC)",
    "Rio de Janeiro (RJ)",
    "Salvador (BA)",
    "Santos (SP)",
    "São José dos Campos (SP)",
    "São Luís (MA)",
    "São Paulo (SP)",
    "Sorocaba (SP)",
    "Teresina (PI)",
    "Uberlândia (MG)",
    "Vitória (ES)",
];

/// Default number of suggestions returned
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

#[derive(Debug, Clone)]
struct Entry {
    label: String,
    city: String,
    label_lower: String,
    city_lower: String,
}

impl Entry {
    fn new(label: &str) -> Self {
        let label = label.trim().to_string();
        // "City (ST)" -> "City"; entries without a state suffix use the whole label
        let city = label
            .rsplit_once(" (")
            .map_or(label.as_str(), |(city, _)| city)
            .trim()
            .to_string();
        Self {
            label_lower: label.to_lowercase(),
            city_lower: city.to_lowercase(),
            label,
            city,
        }
    }
}

/// Searchable list of cities
#[derive(Debug, Clone)]
pub struct CityCatalog {
    entries: Vec<Entry>,
}

impl CityCatalog {
    pub fn builtin() -> Self {
        Self::from_labels(BUILTIN_CITIES.iter().copied())
    }

    /// One entry per line; blank lines and `#` comments are ignored
    pub fn from_lines(text: &str) -> Self {
        Self::from_labels(
            text.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#')),
        )
    }

    fn from_labels<'a>(labels: impl Iterator<Item = &'a str>) -> Self {
        let mut entries: Vec<Entry> = labels.map(Entry::new).collect();
        entries.sort_by(|a, b| a.label_lower.cmp(&b.label_lower));
        entries.dedup_by(|a, b| a.label_lower == b.label_lower);
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ranked case-insensitive matches for `query`, at most `limit` of them
    pub fn search(&self, query: &str, limit: usize) -> Vec<String> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut ranked: Vec<(u8, &Entry)> = self
            .entries
            .iter()
            .filter_map(|e| {
                let tier = if e.city_lower == needle {
                    0
                } else if e.city_lower.starts_with(&needle) {
                    1
                } else if e.label_lower.contains(&needle) {
                    2
                } else {
                    return None;
                };
                Some((tier, e))
            })
            .collect();

        // entries are already alphabetical, so a stable sort by tier suffices
        ranked.sort_by_key(|(tier, _)| *tier);
        ranked
            .into_iter()
            .take(limit)
            .map(|(_, e)| e.label.clone())
            .collect()
    }

    /// City name without the state suffix, for a label in this catalog
    pub fn city_name(&self, label: &str) -> Option<&str> {
        let lower = label.trim().to_lowercase();
        self.entries
            .iter()
            .find(|e| e.label_lower == lower)
            .map(|e| e.city.as_str())
    }
}

impl Default for CityCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
