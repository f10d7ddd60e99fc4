//! Raw and display data models.
//!
//! Raw types mirror the local REST API's JSON and are consumed once per
//! render cycle. Display types are the immutable projections produced by the
//! [`crate::mapper`]; every one of them has a non-empty name and a concrete
//! icon.

use serde::{Deserialize, Deserializer, Serialize};

use crate::icon::ConcreteIcon;
use crate::tags::Tag;
use crate::taxonomy::PropertyFormat;

// =============================================================================
// DESERIALIZATION HELPERS
// =============================================================================

/// Treat `null` like an absent field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept any icon payload; anything unreadable is `RawIcon::None`.
fn lenient_icon<'de, D>(deserializer: D) -> Result<RawIcon, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default())
}

// =============================================================================
// ICONS AND LAYOUTS
// =============================================================================

/// Icon descriptor as sent by the API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum RawIcon {
    Emoji {
        emoji: String,
    },
    File {
        file: String,
    },
    #[default]
    #[serde(other)]
    None,
}

/// Per-object rendering hint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ObjectLayout {
    Basic,
    Profile,
    Action,
    Todo,
    Note,
    Bookmark,
    Set,
    Collection,
    Participant,
    /// Layout added by a newer API version.
    Other(String),
}

impl ObjectLayout {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Basic => "basic",
            Self::Profile => "profile",
            Self::Action => "action",
            Self::Todo => "todo",
            Self::Note => "note",
            Self::Bookmark => "bookmark",
            Self::Set => "set",
            Self::Collection => "collection",
            Self::Participant => "participant",
            Self::Other(s) => s,
        }
    }

    /// Layouts that represent a person and get a circular icon.
    pub fn is_person(&self) -> bool {
        matches!(self, Self::Profile | Self::Participant)
    }
}

impl From<String> for ObjectLayout {
    fn from(s: String) -> Self {
        match s.as_str() {
            "basic" => Self::Basic,
            "profile" => Self::Profile,
            "action" => Self::Action,
            "todo" => Self::Todo,
            "note" => Self::Note,
            "bookmark" => Self::Bookmark,
            "set" => Self::Set,
            "collection" => Self::Collection,
            "participant" => Self::Participant,
            _ => Self::Other(s),
        }
    }
}

impl From<ObjectLayout> for String {
    fn from(layout: ObjectLayout) -> Self {
        layout.as_str().to_string()
    }
}

// =============================================================================
// RAW ENTITIES
// =============================================================================

/// Tag reference inside a select or multi-select value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTag {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub color: String,
}

/// Reference to another object: a bare id or the embedded object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawEntityRef {
    Id(String),
    Object(Box<RawObject>),
}

impl RawEntityRef {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Object(object) => &object.id,
        }
    }
}

/// Property definition, optionally carrying one populated value slot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawProperty {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Kept as a string so unknown formats surface in the mapper.
    #[serde(default, deserialize_with = "null_as_default")]
    pub format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<RawTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_select: Option<Vec<RawTag>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<RawEntityRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkbox: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objects: Option<Vec<RawEntityRef>>,
}

impl RawProperty {
    /// Formats whose value slot is populated, in taxonomy order.
    pub fn populated_slots(&self) -> Vec<PropertyFormat> {
        let slots = [
            (PropertyFormat::Text, self.text.is_some()),
            (PropertyFormat::Number, self.number.is_some()),
            (PropertyFormat::Select, self.select.is_some()),
            (PropertyFormat::MultiSelect, self.multi_select.is_some()),
            (PropertyFormat::Date, self.date.is_some()),
            (PropertyFormat::Files, self.files.is_some()),
            (PropertyFormat::Checkbox, self.checkbox.is_some()),
            (PropertyFormat::Url, self.url.is_some()),
            (PropertyFormat::Email, self.email.is_some()),
            (PropertyFormat::Phone, self.phone.is_some()),
            (PropertyFormat::Objects, self.objects.is_some()),
        ];
        slots
            .into_iter()
            .filter_map(|(format, set)| set.then_some(format))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawType {
    pub id: String,
    #[serde(
        default,
        alias = "type_key",
        alias = "unique_key",
        deserialize_with = "null_as_default"
    )]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_icon")]
    pub icon: RawIcon,
    #[serde(default, alias = "recommended_layout")]
    pub layout: Option<ObjectLayout>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub archived: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: Vec<RawProperty>,
}

/// Object (or template) in a space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObject {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub space_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_icon")]
    pub icon: RawIcon,
    #[serde(default, deserialize_with = "null_as_default")]
    pub snippet: String,
    #[serde(default)]
    pub layout: Option<ObjectLayout>,
    #[serde(default, rename = "type")]
    pub object_type: Option<RawType>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub archived: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: Vec<RawProperty>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMember {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_icon")]
    pub icon: RawIcon,
    #[serde(default, deserialize_with = "null_as_default")]
    pub identity: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub global_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSpace {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_icon")]
    pub icon: RawIcon,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gateway_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub network_id: String,
}

/// Any raw entity, discriminated by the API's `object` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "object", rename_all = "snake_case")]
pub enum RawEntity {
    #[serde(alias = "template")]
    Object(RawObject),
    Type(RawType),
    Member(RawMember),
    Property(RawProperty),
    Space(RawSpace),
}

// =============================================================================
// PAGINATION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: usize,
    #[serde(default, deserialize_with = "null_as_default")]
    pub offset: usize,
    #[serde(default, deserialize_with = "null_as_default")]
    pub limit: usize,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_more: bool,
}

/// List endpoint envelope. A `null` data array reads as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct PaginatedResponse<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_default")]
    pub data: Vec<T>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pagination: Pagination,
}

// =============================================================================
// DISPLAY ENTITIES
// =============================================================================

/// Link to another object inside an object/file property value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectLink {
    pub id: String,
    /// Filled when the object was embedded or looked up during hydration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Typed property value; the variant always matches the property format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    Text(String),
    Number(f64),
    Select(Tag),
    MultiSelect(Vec<Tag>),
    /// Timestamp string as sent by the API.
    Date(String),
    Files(Vec<ObjectLink>),
    Checkbox(bool),
    Url(String),
    Email(String),
    Phone(String),
    Objects(Vec<ObjectLink>),
}

impl PropertyValue {
    pub fn format(&self) -> PropertyFormat {
        match self {
            Self::Text(_) => PropertyFormat::Text,
            Self::Number(_) => PropertyFormat::Number,
            Self::Select(_) => PropertyFormat::Select,
            Self::MultiSelect(_) => PropertyFormat::MultiSelect,
            Self::Date(_) => PropertyFormat::Date,
            Self::Files(_) => PropertyFormat::Files,
            Self::Checkbox(_) => PropertyFormat::Checkbox,
            Self::Url(_) => PropertyFormat::Url,
            Self::Email(_) => PropertyFormat::Email,
            Self::Phone(_) => PropertyFormat::Phone,
            Self::Objects(_) => PropertyFormat::Objects,
        }
    }

    /// Object links carried by file/object values.
    pub fn links_mut(&mut self) -> Option<&mut Vec<ObjectLink>> {
        match self {
            Self::Files(links) | Self::Objects(links) => Some(links),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayProperty {
    pub id: String,
    pub key: String,
    pub name: String,
    pub format: PropertyFormat,
    pub icon: ConcreteIcon,
    /// `None` for bare definitions (type schemas) and unset values.
    pub value: Option<PropertyValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayType {
    pub id: String,
    pub space_id: String,
    pub key: String,
    pub name: String,
    pub icon: ConcreteIcon,
    pub layout: Option<ObjectLayout>,
    pub archived: bool,
    pub properties: Vec<DisplayProperty>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayObject {
    pub id: String,
    pub space_id: String,
    pub name: String,
    pub icon: ConcreteIcon,
    pub snippet: String,
    pub layout: Option<ObjectLayout>,
    pub object_type: Option<DisplayType>,
    pub archived: bool,
    /// `None` unless the object was mapped with full hydration.
    pub properties: Option<Vec<DisplayProperty>>,
}

impl DisplayObject {
    pub fn type_key(&self) -> Option<&str> {
        self.object_type.as_ref().map(|t| t.key.as_str())
    }

    pub fn property(&self, key: &str) -> Option<&DisplayProperty> {
        self.properties.as_ref()?.iter().find(|p| p.key == key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMember {
    pub id: String,
    pub space_id: String,
    pub name: String,
    pub icon: ConcreteIcon,
    pub identity: String,
    pub global_name: String,
    pub role: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySpace {
    pub id: String,
    pub name: String,
    pub icon: ConcreteIcon,
    pub description: String,
    pub gateway_url: String,
    pub network_id: String,
}

/// Any display entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "object", rename_all = "snake_case")]
pub enum DisplayEntity {
    Object(DisplayObject),
    Type(DisplayType),
    Member(DisplayMember),
    Property(DisplayProperty),
    Space(DisplaySpace),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_icon_variants() {
        let emoji: RawIcon = serde_json::from_value(json!({"format": "emoji", "emoji": "🚀"})).unwrap();
        assert_eq!(
            emoji,
            RawIcon::Emoji {
                emoji: "🚀".to_string()
            }
        );
        let file: RawIcon = serde_json::from_value(json!({"format": "file", "file": "bafy"})).unwrap();
        assert_eq!(
            file,
            RawIcon::File {
                file: "bafy".to_string()
            }
        );
        let builtin: RawIcon =
            serde_json::from_value(json!({"format": "icon", "name": "document", "color": "grey"}))
                .unwrap();
        assert_eq!(builtin, RawIcon::None);
    }

    #[test]
    fn test_object_tolerates_missing_and_null_fields() {
        let object: RawObject = serde_json::from_value(json!({
            "id": "obj1",
            "name": null,
            "icon": null,
            "snippet": null,
            "properties": null
        }))
        .unwrap();
        assert_eq!(object.name, "");
        assert_eq!(object.icon, RawIcon::None);
        assert!(object.properties.is_empty());
        assert!(object.object_type.is_none());
        assert!(object.layout.is_none());
    }

    #[test]
    fn test_null_flags_and_pagination_read_as_defaults() {
        let object: RawObject =
            serde_json::from_value(json!({"id": "o", "archived": null})).unwrap();
        assert!(!object.archived);
        let t: RawType = serde_json::from_value(json!({"id": "t", "archived": null})).unwrap();
        assert!(!t.archived);

        let page: PaginatedResponse<RawObject> = serde_json::from_value(json!({
            "data": [{"id": "o"}],
            "pagination": {"total": null, "offset": null, "limit": null, "has_more": null}
        }))
        .unwrap();
        assert_eq!(page.pagination, Pagination::default());
        let page: PaginatedResponse<RawObject> =
            serde_json::from_value(json!({"data": [], "pagination": null})).unwrap();
        assert!(!page.pagination.has_more);
    }

    #[test]
    fn test_select_tag_without_id() {
        let property: RawProperty = serde_json::from_value(json!({
            "key": "status",
            "format": "select",
            "select": {"name": "Done", "color": "lime"}
        }))
        .unwrap();
        let tag = property.select.unwrap();
        assert_eq!(tag.id, "");
        assert_eq!(tag.name, "Done");
        let tag: RawTag = serde_json::from_value(json!({"id": null, "name": "x"})).unwrap();
        assert_eq!(tag.id, "");
    }

    #[test]
    fn test_malformed_icon_reads_as_none() {
        let member: RawMember = serde_json::from_value(json!({
            "id": "m1",
            "icon": {"emoji": "missing tag"}
        }))
        .unwrap();
        assert_eq!(member.icon, RawIcon::None);
    }

    #[test]
    fn test_layout_keeps_unknown_values() {
        let layout: ObjectLayout = serde_json::from_value(json!("chat")).unwrap();
        assert_eq!(layout, ObjectLayout::Other("chat".to_string()));
        assert_eq!(serde_json::to_value(&layout).unwrap(), json!("chat"));
        let layout: ObjectLayout = serde_json::from_value(json!("profile")).unwrap();
        assert!(layout.is_person());
    }

    #[test]
    fn test_type_key_aliases() {
        let t: RawType = serde_json::from_value(json!({
            "id": "t1",
            "type_key": "ot-page",
            "recommended_layout": "basic"
        }))
        .unwrap();
        assert_eq!(t.key, "ot-page");
        assert_eq!(t.layout, Some(ObjectLayout::Basic));
    }

    #[test]
    fn test_entity_ref_id_or_object() {
        let refs: Vec<RawEntityRef> =
            serde_json::from_value(json!(["abc", {"id": "def", "name": "Linked"}])).unwrap();
        assert_eq!(refs[0].id(), "abc");
        assert_eq!(refs[1].id(), "def");
        assert!(matches!(refs[1], RawEntityRef::Object(_)));
    }

    #[test]
    fn test_populated_slots() {
        let property: RawProperty = serde_json::from_value(json!({
            "key": "done",
            "format": "checkbox",
            "checkbox": false
        }))
        .unwrap();
        assert_eq!(property.populated_slots(), vec![PropertyFormat::Checkbox]);

        let definition: RawProperty =
            serde_json::from_value(json!({"key": "x", "format": "text"})).unwrap();
        assert!(definition.populated_slots().is_empty());
    }

    #[test]
    fn test_raw_entity_discriminator() {
        let entity: RawEntity = serde_json::from_value(json!({
            "object": "template",
            "id": "tpl1",
            "name": "Meeting"
        }))
        .unwrap();
        assert!(matches!(entity, RawEntity::Object(ref o) if o.id == "tpl1"));

        let entity: RawEntity = serde_json::from_value(json!({
            "object": "member",
            "id": "m1",
            "role": "owner"
        }))
        .unwrap();
        assert!(matches!(entity, RawEntity::Member(ref m) if m.role == "owner"));
    }

    #[test]
    fn test_paginated_response_null_data() {
        let page: PaginatedResponse<RawObject> = serde_json::from_value(json!({
            "data": null,
            "pagination": {"total": 0, "offset": 0, "limit": 50, "has_more": false}
        }))
        .unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.pagination.limit, 50);
    }
}
