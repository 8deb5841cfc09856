use serde::{Deserialize, Deserializer, Serialize};

/// One self-assessment facet: the tags a user picked plus optional free text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Facet {
    #[serde(default, alias = "tags", deserialize_with = "null_as_default")]
    pub selected: Vec<String>,
    #[serde(default, alias = "other")]
    pub additional: Option<String>,
}

/// The `discovery_data` document written by the discovery flow.
///
/// Any facet may be missing or `null`; both read as an empty facet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Facet,
    #[serde(default, deserialize_with = "null_as_default")]
    pub values: Facet,
    #[serde(default, deserialize_with = "null_as_default")]
    pub interests: Facet,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
