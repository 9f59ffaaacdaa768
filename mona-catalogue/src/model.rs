//! Catalogue and artwork record types.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{CatalogueError, CatalogueResult};

/// Text fields that this system writes back into artwork records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnrichmentField {
    /// Long-form background on the work (`informations_ia`).
    Informations,
    /// Short visitor guide on what to look at (`ce_quil_faut_voir`).
    CeQuilFautVoir,
}

impl EnrichmentField {
    /// Returns the JSON key holding this field in an artwork record.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Informations => "informations_ia",
            Self::CeQuilFautVoir => "ce_quil_faut_voir",
        }
    }
}

impl fmt::Display for EnrichmentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A single catalogued artwork.
///
/// The record is kept as the JSON object it was read from, so serializing it
/// writes back every key in its original order, including `null` values and
/// fields this crate does not model. The typed accessors read a validated view
/// of that object.
#[derive(Debug, Clone, PartialEq)]
pub struct Artwork {
    id: String,
    titre: Option<String>,
    artiste: Option<String>,
    date: Option<Value>,
    musee: Option<String>,
    techniques: Vec<String>,
    informations_ia: Option<String>,
    ce_quil_faut_voir: Option<String>,
    record: Map<String, Value>,
}

/// Typed view of the keys this crate interprets.
#[derive(Deserialize)]
struct ArtworkFields {
    id: String,
    #[serde(default)]
    titre: Option<String>,
    #[serde(default)]
    artiste: Option<String>,
    #[serde(default)]
    date: Option<Value>,
    #[serde(default)]
    musee: Option<String>,
    #[serde(default)]
    techniques: Option<Vec<String>>,
    #[serde(default)]
    informations_ia: Option<String>,
    #[serde(default)]
    ce_quil_faut_voir: Option<String>,
}

impl Artwork {
    /// Creates a builder for a new artwork record.
    #[must_use]
    pub fn builder(id: impl Into<String>) -> ArtworkBuilder {
        let mut record = Map::new();
        record.insert("id".to_owned(), Value::String(id.into()));
        ArtworkBuilder { record }
    }

    fn from_record(record: Map<String, Value>) -> Result<Self, serde_json::Error> {
        let fields: ArtworkFields = serde_json::from_value(Value::Object(record.clone()))?;
        Ok(Self {
            id: fields.id,
            titre: fields.titre,
            artiste: fields.artiste,
            date: fields.date,
            musee: fields.musee,
            techniques: fields.techniques.unwrap_or_default(),
            informations_ia: fields.informations_ia,
            ce_quil_faut_voir: fields.ce_quil_faut_voir,
            record,
        })
    }

    /// Returns the catalogue-wide identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn titre(&self) -> Option<&str> {
        self.titre.as_deref()
    }

    /// Returns the artist name.
    #[must_use]
    pub fn artiste(&self) -> Option<&str> {
        self.artiste.as_deref()
    }

    /// Returns the date rendered as plain text.
    ///
    /// Strings are returned as-is, numbers and other scalars use their JSON
    /// rendering, and an absent or `null` date yields an empty string.
    #[must_use]
    pub fn date_text(&self) -> String {
        match &self.date {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Returns the museum label carried by the record itself.
    #[must_use]
    pub fn musee(&self) -> Option<&str> {
        self.musee.as_deref()
    }

    /// Returns the list of techniques, empty when the record has none.
    #[must_use]
    pub fn techniques(&self) -> &[String] {
        &self.techniques
    }

    /// Returns the current value of an enrichment field.
    ///
    /// An absent key and a `null` value both yield `None`; an empty string is
    /// returned as stored.
    #[must_use]
    pub fn enrichment(&self, field: EnrichmentField) -> Option<&str> {
        match field {
            EnrichmentField::Informations => self.informations_ia.as_deref(),
            EnrichmentField::CeQuilFautVoir => self.ce_quil_faut_voir.as_deref(),
        }
    }

    /// Overwrites an enrichment field.
    ///
    /// An existing key keeps its position in the record; a new key is
    /// appended.
    pub fn set_enrichment(&mut self, field: EnrichmentField, content: impl Into<String>) {
        let content = content.into();
        self.record
            .insert(field.key().to_owned(), Value::String(content.clone()));
        match field {
            EnrichmentField::Informations => self.informations_ia = Some(content),
            EnrichmentField::CeQuilFautVoir => self.ce_quil_faut_voir = Some(content),
        }
    }
}

impl Serialize for Artwork {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.record.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Artwork {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = Map::deserialize(deserializer)?;
        Self::from_record(record).map_err(de::Error::custom)
    }
}

/// Builder type used to assemble [`Artwork`] instances.
#[derive(Debug)]
pub struct ArtworkBuilder {
    record: Map<String, Value>,
}

impl ArtworkBuilder {
    fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.record.insert(key.to_owned(), value.into());
        self
    }

    /// Sets the title.
    #[must_use]
    pub fn titre(self, titre: impl Into<String>) -> Self {
        self.set("titre", titre.into())
    }

    /// Sets the artist.
    #[must_use]
    pub fn artiste(self, artiste: impl Into<String>) -> Self {
        self.set("artiste", artiste.into())
    }

    /// Sets the date.
    #[must_use]
    pub fn date(self, date: impl Into<Value>) -> Self {
        self.set("date", date)
    }

    /// Sets the museum label.
    #[must_use]
    pub fn musee(self, musee: impl Into<String>) -> Self {
        self.set("musee", musee.into())
    }

    /// Sets the list of techniques.
    #[must_use]
    pub fn techniques<I, S>(self, techniques: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list: Vec<Value> = techniques
            .into_iter()
            .map(|technique| Value::String(technique.into()))
            .collect();
        self.set("techniques", list)
    }

    /// Finalises the builder and produces the record.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::InvalidRecord`] when the identifier is blank.
    pub fn build(self) -> CatalogueResult<Artwork> {
        let blank = self
            .record
            .get("id")
            .and_then(Value::as_str)
            .is_none_or(|id| id.trim().is_empty());
        if blank {
            return Err(CatalogueError::InvalidRecord(
                "artwork id must not be empty",
            ));
        }
        Ok(Artwork::from_record(self.record)?)
    }
}

/// Museums and their artworks, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Catalogue {
    museums: IndexMap<String, Vec<Artwork>>,
}

impl Catalogue {
    /// Parses and validates a catalogue document.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::Serialization`] when the bytes are not JSON and
    /// [`CatalogueError::Schema`] when the root is not an object, a museum entry
    /// is not a list, or an artwork record is malformed.
    pub fn from_slice(bytes: &[u8]) -> CatalogueResult<Self> {
        let root: Value = serde_json::from_slice(bytes)?;
        let entries = match root {
            Value::Object(entries) => entries,
            other => {
                return Err(CatalogueError::schema(
                    "<root>",
                    format!("expected an object of museums, found {}", kind_of(&other)),
                ));
            }
        };

        let mut museums = IndexMap::with_capacity(entries.len());
        for (museum, value) in entries {
            let items = match value {
                Value::Array(items) => items,
                other => {
                    let reason = format!("expected a list of artworks, found {}", kind_of(&other));
                    return Err(CatalogueError::schema(museum, reason));
                }
            };

            let mut artworks = Vec::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                let artwork: Artwork = serde_json::from_value(item).map_err(|err| {
                    CatalogueError::schema(museum.clone(), format!("artwork #{index}: {err}"))
                })?;
                artworks.push(artwork);
            }
            museums.insert(museum, artworks);
        }

        Ok(Self { museums })
    }

    /// Renders the catalogue as indented UTF-8 JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::Serialization`] if rendering fails.
    pub fn to_pretty_json(&self) -> CatalogueResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Iterates museums in document order.
    pub fn museums(&self) -> impl Iterator<Item = (&str, &[Artwork])> {
        self.museums
            .iter()
            .map(|(name, artworks)| (name.as_str(), artworks.as_slice()))
    }

    /// Returns the total number of artworks across all museums.
    #[must_use]
    pub fn artwork_count(&self) -> usize {
        self.museums.values().map(Vec::len).sum()
    }

    /// Finds an artwork by id, returning the containing museum name too.
    ///
    /// The first match wins, scanning museums in document order and then
    /// artworks in list order.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<(&str, &Artwork)> {
        self.museums.iter().find_map(|(museum, artworks)| {
            artworks
                .iter()
                .find(|artwork| artwork.id == id)
                .map(|artwork| (museum.as_str(), artwork))
        })
    }

    /// Mutable counterpart of [`Catalogue::find`].
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Artwork> {
        self.museums
            .values_mut()
            .flat_map(|artworks| artworks.iter_mut())
            .find(|artwork| artwork.id == id)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "Louvre": [
            { "id": "monalisa", "titre": "La Joconde", "artiste": "Léonard de Vinci", "image": "joconde.jpg" },
            { "id": "radeau", "titre": "Le Radeau de la Méduse", "date": 1819 }
        ],
        "Orsay": [
            { "id": "monalisa", "titre": "Doublon" },
            { "id": "olympia", "techniques": ["Huile", "Toile"], "ce_quil_faut_voir": "Le regard" }
        ]
    }"#;

    #[test]
    fn find_returns_first_match_in_document_order() {
        let catalogue = Catalogue::from_slice(SAMPLE.as_bytes()).unwrap();
        let (museum, artwork) = catalogue.find("monalisa").unwrap();
        assert_eq!(museum, "Louvre");
        assert_eq!(artwork.titre(), Some("La Joconde"));

        let (museum, artwork) = catalogue.find("olympia").unwrap();
        assert_eq!(museum, "Orsay");
        assert_eq!(artwork.techniques(), ["Huile", "Toile"]);
        assert!(catalogue.find("absent").is_none());
    }

    #[test]
    fn find_mut_updates_the_first_match_only() {
        let mut catalogue = Catalogue::from_slice(SAMPLE.as_bytes()).unwrap();
        catalogue
            .find_mut("monalisa")
            .unwrap()
            .set_enrichment(EnrichmentField::Informations, "texte");

        let museums: Vec<_> = catalogue.museums().collect();
        assert_eq!(
            museums[0].1[0].enrichment(EnrichmentField::Informations),
            Some("texte")
        );
        assert_eq!(museums[1].1[0].enrichment(EnrichmentField::Informations), None);
    }

    #[test]
    fn rejects_non_list_museum_entries() {
        let err = Catalogue::from_slice(br#"{"Louvre": [], "version": 3}"#).unwrap_err();
        match err {
            CatalogueError::Schema { museum, reason } => {
                assert_eq!(museum, "version");
                assert!(reason.contains("a number"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_artworks_without_id() {
        let err = Catalogue::from_slice(br#"{"Louvre": [{"titre": "Sans id"}]}"#).unwrap_err();
        assert!(matches!(err, CatalogueError::Schema { ref museum, .. } if museum == "Louvre"));
    }

    #[test]
    fn rejects_non_object_root() {
        let err = Catalogue::from_slice(b"[]").unwrap_err();
        assert!(matches!(err, CatalogueError::Schema { .. }));

        let err = Catalogue::from_slice(b"{not json").unwrap_err();
        assert!(matches!(err, CatalogueError::Serialization { .. }));
    }

    #[test]
    fn date_text_handles_strings_and_numbers() {
        let catalogue = Catalogue::from_slice(SAMPLE.as_bytes()).unwrap();
        assert_eq!(catalogue.find("radeau").unwrap().1.date_text(), "1819");
        assert_eq!(catalogue.find("monalisa").unwrap().1.date_text(), "");

        let artwork = Artwork::builder("x").date("vers 1503").build().unwrap();
        assert_eq!(artwork.date_text(), "vers 1503");
    }

    #[test]
    fn rendering_keeps_unknown_fields_and_order() {
        let catalogue = Catalogue::from_slice(SAMPLE.as_bytes()).unwrap();
        let rendered = String::from_utf8(catalogue.to_pretty_json().unwrap()).unwrap();

        assert!(rendered.contains("\"image\": \"joconde.jpg\""));
        assert!(rendered.contains("Léonard de Vinci"));
        assert!(rendered.find("\"Louvre\"").unwrap() < rendered.find("\"Orsay\"").unwrap());
        assert_eq!(Catalogue::from_slice(rendered.as_bytes()).unwrap(), catalogue);
    }

    #[test]
    fn records_keep_nulls_and_key_order() {
        let source = r#"{"Louvre":[{"zeta":1,"id":"b","titre":null,"alpha":2,"informations_ia":null}]}"#;
        let mut catalogue = Catalogue::from_slice(source.as_bytes()).unwrap();
        assert_eq!(serde_json::to_string(&catalogue).unwrap(), source);

        let artwork = catalogue.find_mut("b").unwrap();
        assert_eq!(artwork.titre(), None);
        assert_eq!(artwork.enrichment(EnrichmentField::Informations), None);
        artwork.set_enrichment(EnrichmentField::Informations, "texte");
        artwork.set_enrichment(EnrichmentField::CeQuilFautVoir, "voir");
        assert_eq!(
            serde_json::to_string(&catalogue).unwrap(),
            r#"{"Louvre":[{"zeta":1,"id":"b","titre":null,"alpha":2,"informations_ia":"texte","ce_quil_faut_voir":"voir"}]}"#
        );
    }

    #[test]
    fn empty_enrichment_is_reported_as_stored() {
        let catalogue =
            Catalogue::from_slice(br#"{"Louvre":[{"id":"m","informations_ia":""}]}"#).unwrap();
        let artwork = catalogue.find("m").unwrap().1;
        assert_eq!(artwork.enrichment(EnrichmentField::Informations), Some(""));
    }

    #[test]
    fn typed_fields_must_have_the_right_type() {
        let err = Catalogue::from_slice(br#"{"Louvre":[{"id":"m","titre":7}]}"#).unwrap_err();
        assert!(matches!(err, CatalogueError::Schema { .. }));
    }

    #[test]
    fn builder_rejects_blank_ids() {
        let err = Artwork::builder("  ").build().expect_err("blank id should fail");
        assert!(matches!(err, CatalogueError::InvalidRecord(_)));
        assert_eq!(Catalogue::default().artwork_count(), 0);
    }
}
