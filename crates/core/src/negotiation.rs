//! Media-type driven selection of resource representations.
//!
//! A [`VariantTable`] is an ordered list of `(accepted media types, variant)`
//! pairs plus an optional fallback. At request time the values of one header
//! (`Accept` for reads, `Content-Type` for writes) are split into tokens and
//! compared case-sensitively against each entry.
//!
//! Token sets must be disjoint across entries; [`VariantTableBuilder::build`]
//! rejects overlapping registrations.

use std::collections::HashSet;

use crate::error::CoreError;

/// Split raw header values into comparable media-type tokens.
///
/// Every header instance may hold a comma-separated list. Tokens are trimmed
/// and any parameters after `;` (e.g. `q=0.9`, `charset=utf-8`) are dropped.
/// Empty tokens are skipped.
pub fn header_tokens<'a, I>(values: I) -> impl Iterator<Item = &'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    values
        .into_iter()
        .flat_map(|value| value.split(','))
        .map(|token| token.split(';').next().unwrap_or_default().trim())
        .filter(|token| !token.is_empty())
}

/// The first of `accepted` present as a token in `values`, if any.
///
/// Comparison is exact and case-sensitive.
pub fn matching_media_type<'a, I>(values: I, accepted: &[&'static str]) -> Option<&'static str>
where
    I: IntoIterator<Item = &'a str>,
{
    let tokens: Vec<&str> = header_tokens(values).collect();
    accepted
        .iter()
        .copied()
        .find(|media_type| tokens.contains(media_type))
}

/// Outcome of [`VariantTable::select`].
#[derive(Debug, PartialEq, Eq)]
pub enum Selection<'t, V> {
    /// Exactly one registered entry matched. Carries the token that matched.
    Matched {
        variant: &'t V,
        media_type: &'static str,
    },
    /// No entry matched and the table has a fallback.
    Fallback(&'t V),
    /// No entry matched and the table has no fallback.
    NoMatch,
    /// Tokens from two or more different entries were present.
    Ambiguous,
}

#[derive(Debug)]
struct Entry<V> {
    media_types: Vec<&'static str>,
    variant: V,
}

/// Ordered routing table from media types to representation variants.
#[derive(Debug)]
pub struct VariantTable<V> {
    entries: Vec<Entry<V>>,
    fallback: Option<V>,
}

impl<V> VariantTable<V> {
    pub fn builder() -> VariantTableBuilder<V> {
        VariantTableBuilder {
            entries: Vec::new(),
            fallback: None,
        }
    }

    /// Pick the variant for a request given the values of its selector header.
    pub fn select<'a, I>(&self, header_values: I) -> Selection<'_, V>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let values: Vec<&str> = header_values.into_iter().collect();

        let mut matched = self.entries.iter().filter_map(|entry| {
            matching_media_type(values.iter().copied(), &entry.media_types)
                .map(|media_type| (entry, media_type))
        });

        match (matched.next(), matched.next()) {
            (Some((entry, media_type)), None) => Selection::Matched {
                variant: &entry.variant,
                media_type,
            },
            (Some(_), Some(_)) => Selection::Ambiguous,
            (None, _) => match &self.fallback {
                Some(fallback) => Selection::Fallback(fallback),
                None => Selection::NoMatch,
            },
        }
    }
}

/// Builder for [`VariantTable`].
#[derive(Debug)]
pub struct VariantTableBuilder<V> {
    entries: Vec<Entry<V>>,
    fallback: Option<V>,
}

impl<V> VariantTableBuilder<V> {
    /// Register a variant eligible when any of `media_types` is present.
    pub fn variant(mut self, media_types: &[&'static str], variant: V) -> Self {
        self.entries.push(Entry {
            media_types: media_types.to_vec(),
            variant,
        });
        self
    }

    /// Register the unconditionally eligible variant used when nothing matches.
    pub fn fallback(mut self, variant: V) -> Self {
        self.fallback = Some(variant);
        self
    }

    /// Finish the table, rejecting empty or overlapping token sets.
    pub fn build(self) -> Result<VariantTable<V>, CoreError> {
        let mut seen = HashSet::new();
        for entry in &self.entries {
            if entry.media_types.is_empty() {
                return Err(CoreError::Configuration(
                    "variant registered without any media type".to_string(),
                ));
            }
            for media_type in &entry.media_types {
                if !seen.insert(*media_type) {
                    return Err(CoreError::Configuration(format!(
                        "media type '{media_type}' registered for more than one variant"
                    )));
                }
            }
        }

        Ok(VariantTable {
            entries: self.entries,
            fallback: self.fallback,
        })
    }
}
