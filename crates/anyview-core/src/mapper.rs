//! Entity mapper.
//!
//! Turns raw API entities into display entities. All functions are pure
//! given their inputs and the outcome of the collaborator lookups: icon file
//! resolution and, under [`Hydration::Full`], the names of linked objects.
//!
//! Cosmetic gaps (missing names, icons, optional fields) never fail a
//! mapping. Taxonomy violations (unknown formats, value slots that disagree
//! with the declared format) do.

use futures::future::{join_all, try_join_all};
use tracing::{debug, trace};

use crate::defaults;
use crate::error::{Error, Result};
use crate::icon::{resolve_icon, EntityKind, IconContext, IconMask};
use crate::models::*;
use crate::tags::normalize_tag;
use crate::taxonomy::{icon_for_format, PropertyFormat};
use crate::traits::{FileResolver, ObjectSource, Page};

/// How much of an object to map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Hydration {
    /// List views: no property values, no linked-object lookups.
    #[default]
    Summary,
    /// Detail views: properties mapped and linked object names looked up.
    Full,
}

pub(crate) fn display_name(name: &str) -> String {
    if name.is_empty() {
        defaults::UNTITLED.to_string()
    } else {
        name.to_string()
    }
}

fn links(refs: Vec<RawEntityRef>) -> Vec<ObjectLink> {
    refs.into_iter()
        .map(|r| match r {
            RawEntityRef::Id(id) => ObjectLink { id, name: None },
            RawEntityRef::Object(object) => ObjectLink {
                name: Some(display_name(&object.name)),
                id: object.id,
            },
        })
        .collect()
}

/// Map a property definition or value.
///
/// Fails with [`Error::UnsupportedFormat`] for formats outside the taxonomy
/// and [`Error::FormatMismatch`] when a populated value slot disagrees with
/// the declared format.
pub fn map_property(raw: RawProperty) -> Result<DisplayProperty> {
    let format: PropertyFormat = raw.format.parse()?;

    if let Some(found) = raw.populated_slots().into_iter().find(|f| *f != format) {
        return Err(Error::FormatMismatch {
            key: raw.key,
            format: format.to_string(),
            found: found.to_string(),
        });
    }

    let RawProperty {
        id,
        key,
        name,
        text,
        number,
        select,
        multi_select,
        date,
        files,
        checkbox,
        url,
        email,
        phone,
        objects,
        ..
    } = raw;

    let value = match format {
        PropertyFormat::Text => text.map(PropertyValue::Text),
        PropertyFormat::Number => number.map(PropertyValue::Number),
        PropertyFormat::Select => select.map(|t| PropertyValue::Select(normalize_tag(t))),
        PropertyFormat::MultiSelect => multi_select
            .map(|tags| PropertyValue::MultiSelect(tags.into_iter().map(normalize_tag).collect())),
        PropertyFormat::Date => date.map(PropertyValue::Date),
        PropertyFormat::Files => files.map(|refs| PropertyValue::Files(links(refs))),
        PropertyFormat::Checkbox => checkbox.map(PropertyValue::Checkbox),
        PropertyFormat::Url => url.map(PropertyValue::Url),
        PropertyFormat::Email => email.map(PropertyValue::Email),
        PropertyFormat::Phone => phone.map(PropertyValue::Phone),
        PropertyFormat::Objects => objects.map(|refs| PropertyValue::Objects(links(refs))),
    };

    Ok(DisplayProperty {
        id,
        name: display_name(&name),
        key,
        format,
        icon: icon_for_format(format),
        value,
    })
}

pub fn map_properties(raw: Vec<RawProperty>) -> Result<Vec<DisplayProperty>> {
    raw.into_iter().map(map_property).collect()
}

/// Maps raw entities using the given collaborators.
#[derive(Clone, Copy)]
pub struct Mapper<'a> {
    files: &'a dyn FileResolver,
    objects: Option<&'a dyn ObjectSource>,
}

impl<'a> Mapper<'a> {
    pub fn new(files: &'a dyn FileResolver) -> Self {
        Self {
            files,
            objects: None,
        }
    }

    /// Object source used to name linked objects under full hydration.
    pub fn with_object_source(mut self, objects: &'a dyn ObjectSource) -> Self {
        self.objects = Some(objects);
        self
    }

    pub async fn map_object(&self, raw: RawObject, hydration: Hydration) -> Result<DisplayObject> {
        let ctx = IconContext::object(raw.layout.clone());
        let icon = resolve_icon(&raw.icon, &ctx, self.files).await;

        let object_type = match raw.object_type {
            Some(t) => Some(self.map_type_summary(&raw.space_id, t).await),
            None => None,
        };

        let properties = match hydration {
            Hydration::Summary => None,
            Hydration::Full => Some(self.hydrate_properties(&raw.space_id, raw.properties).await?),
        };

        trace!(component = "mapper", space_id = %raw.space_id, object_id = %raw.id, "Mapped object");

        Ok(DisplayObject {
            id: raw.id,
            space_id: raw.space_id,
            name: display_name(&raw.name),
            icon,
            snippet: raw.snippet,
            layout: raw.layout,
            object_type,
            archived: raw.archived,
            properties,
        })
    }

    pub async fn map_objects(
        &self,
        raw: Vec<RawObject>,
        hydration: Hydration,
    ) -> Result<Vec<DisplayObject>> {
        let count = raw.len();
        let mapped = try_join_all(raw.into_iter().map(|o| self.map_object(o, hydration))).await?;
        trace!(component = "mapper", result_count = count, "Mapped objects");
        Ok(mapped)
    }

    pub async fn map_type(&self, space_id: &str, mut raw: RawType) -> Result<DisplayType> {
        let properties = map_properties(std::mem::take(&mut raw.properties))?;
        let mut display = self.map_type_summary(space_id, raw).await;
        display.properties = properties;
        Ok(display)
    }

    pub async fn map_types(&self, space_id: &str, raw: Vec<RawType>) -> Result<Vec<DisplayType>> {
        try_join_all(raw.into_iter().map(|t| self.map_type(space_id, t))).await
    }

    /// Type without its property definitions, as embedded in objects.
    async fn map_type_summary(&self, space_id: &str, raw: RawType) -> DisplayType {
        let icon = resolve_icon(&raw.icon, &IconContext::new(EntityKind::Type), self.files).await;
        DisplayType {
            id: raw.id,
            space_id: space_id.to_string(),
            key: raw.key,
            name: display_name(&raw.name),
            icon,
            layout: raw.layout,
            archived: raw.archived,
            properties: Vec::new(),
        }
    }

    /// Members always get a circular icon.
    pub async fn map_member(&self, space_id: &str, raw: RawMember) -> DisplayMember {
        let icon = resolve_icon(&raw.icon, &IconContext::new(EntityKind::Member), self.files)
            .await
            .with_mask(IconMask::Circle);
        DisplayMember {
            id: raw.id,
            space_id: space_id.to_string(),
            name: display_name(&raw.name),
            icon,
            identity: raw.identity,
            global_name: raw.global_name,
            role: raw.role,
            status: raw.status,
        }
    }

    pub async fn map_members(&self, space_id: &str, raw: Vec<RawMember>) -> Vec<DisplayMember> {
        join_all(raw.into_iter().map(|m| self.map_member(space_id, m))).await
    }

    pub async fn map_space(&self, raw: RawSpace) -> DisplaySpace {
        let icon = resolve_icon(&raw.icon, &IconContext::new(EntityKind::Space), self.files).await;
        DisplaySpace {
            id: raw.id,
            name: display_name(&raw.name),
            icon,
            description: raw.description,
            gateway_url: raw.gateway_url,
            network_id: raw.network_id,
        }
    }

    pub async fn map_spaces(&self, raw: Vec<RawSpace>) -> Vec<DisplaySpace> {
        join_all(raw.into_iter().map(|s| self.map_space(s))).await
    }

    /// Map any raw entity. `space_id` scopes types and members, which do not
    /// carry their space in the payload.
    pub async fn map_entity(
        &self,
        space_id: &str,
        raw: RawEntity,
        hydration: Hydration,
    ) -> Result<DisplayEntity> {
        Ok(match raw {
            RawEntity::Object(o) => DisplayEntity::Object(self.map_object(o, hydration).await?),
            RawEntity::Type(t) => DisplayEntity::Type(self.map_type(space_id, t).await?),
            RawEntity::Member(m) => DisplayEntity::Member(self.map_member(space_id, m).await),
            RawEntity::Property(p) => DisplayEntity::Property(map_property(p)?),
            RawEntity::Space(s) => DisplayEntity::Space(self.map_space(s).await),
        })
    }

    /// Map a fetched page, keeping its order and `has_more` flag.
    pub async fn map_page(
        &self,
        space_id: &str,
        page: Page<RawEntity>,
        hydration: Hydration,
    ) -> Result<Page<DisplayEntity>> {
        let items = try_join_all(
            page.items
                .into_iter()
                .map(|e| self.map_entity(space_id, e, hydration)),
        )
        .await?;
        Ok(Page {
            items,
            has_more: page.has_more,
        })
    }

    async fn hydrate_properties(
        &self,
        space_id: &str,
        raw: Vec<RawProperty>,
    ) -> Result<Vec<DisplayProperty>> {
        let mut properties = map_properties(raw)?;
        let Some(source) = self.objects else {
            return Ok(properties);
        };

        for property in &mut properties {
            let Some(links) = property.value.as_mut().and_then(PropertyValue::links_mut) else {
                continue;
            };
            let names = join_all(links.iter().map(|link| async move {
                if link.name.is_some() {
                    return link.name.clone();
                }
                match source.get_object(space_id, &link.id).await {
                    Ok(object) => Some(display_name(&object.name)),
                    Err(e) => {
                        debug!(
                            component = "mapper",
                            space_id,
                            object_id = %link.id,
                            error = %e,
                            "Linked object lookup failed, leaving name unset"
                        );
                        None
                    }
                }
            }))
            .await;
            for (link, name) in links.iter_mut().zip(names) {
                link.name = name;
            }
        }
        Ok(properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::{Glyph, IconSource};
    use crate::traits::NoFileResolver;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingObjects {
        calls: AtomicUsize,
    }

    impl CountingObjects {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ObjectSource for CountingObjects {
        async fn get_object(&self, space_id: &str, object_id: &str) -> Result<RawObject> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if object_id == "missing" {
                return Err(Error::NotFound(object_id.to_string()));
            }
            Ok(serde_json::from_value(json!({
                "id": object_id,
                "space_id": space_id,
                "name": format!("Name of {}", object_id)
            }))
            .unwrap())
        }
    }

    fn raw_object(value: serde_json::Value) -> RawObject {
        serde_json::from_value(value).unwrap()
    }

    fn raw_property(value: serde_json::Value) -> RawProperty {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_empty_names_become_untitled() {
        let mapper = Mapper::new(&NoFileResolver);
        let object = mapper
            .map_object(raw_object(json!({"id": "o", "name": ""})), Hydration::Summary)
            .await
            .unwrap();
        assert_eq!(object.name, "Untitled");

        let t: RawType = serde_json::from_value(json!({"id": "t"})).unwrap();
        assert_eq!(mapper.map_type("s", t).await.unwrap().name, "Untitled");

        let m: RawMember = serde_json::from_value(json!({"id": "m"})).unwrap();
        assert_eq!(mapper.map_member("s", m).await.name, "Untitled");

        let p = raw_property(json!({"key": "k", "format": "text"}));
        assert_eq!(map_property(p).unwrap().name, "Untitled");

        let s: RawSpace = serde_json::from_value(json!({"id": "sp"})).unwrap();
        assert_eq!(mapper.map_space(s).await.name, "Untitled");
    }

    #[tokio::test]
    async fn test_map_object_is_idempotent() {
        let mapper = Mapper::new(&NoFileResolver);
        let input = raw_object(json!({
            "id": "o1",
            "space_id": "s1",
            "name": "Plan",
            "icon": {"format": "emoji", "emoji": "📝"},
            "layout": "todo",
            "snippet": "write it down",
            "type": {"id": "t1", "key": "ot-task", "name": "Task"},
            "properties": [{"key": "done", "format": "checkbox", "checkbox": true}]
        }));
        let first = mapper.map_object(input.clone(), Hydration::Full).await.unwrap();
        let second = mapper.map_object(input, Hydration::Full).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.icon.source, IconSource::Emoji("📝".to_string()));
        assert_eq!(first.type_key(), Some("ot-task"));
    }

    #[tokio::test]
    async fn test_summary_skips_properties_and_lookups() {
        let objects = CountingObjects::new();
        let mapper = Mapper::new(&NoFileResolver).with_object_source(&objects);
        let input = raw_object(json!({
            "id": "o1",
            "space_id": "s1",
            "properties": [
                {"key": "related", "format": "objects", "objects": ["a", "b"]},
                {"key": "bad", "format": "relation"}
            ]
        }));
        let object = mapper.map_object(input, Hydration::Summary).await.unwrap();
        assert!(object.properties.is_none());
        assert_eq!(objects.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_full_hydration_names_linked_objects() {
        let objects = CountingObjects::new();
        let mapper = Mapper::new(&NoFileResolver).with_object_source(&objects);
        let input = raw_object(json!({
            "id": "o1",
            "space_id": "s1",
            "properties": [{
                "key": "related",
                "format": "objects",
                "objects": ["a", {"id": "b", "name": "Embedded"}, "missing"]
            }]
        }));
        let object = mapper.map_object(input, Hydration::Full).await.unwrap();
        let related = object.property("related").unwrap();
        let Some(PropertyValue::Objects(links)) = &related.value else {
            panic!("expected objects value");
        };
        assert_eq!(links[0].name.as_deref(), Some("Name of a"));
        assert_eq!(links[1].name.as_deref(), Some("Embedded"));
        assert_eq!(links[2].name, None);
        // the embedded object needs no lookup
        assert_eq!(objects.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_full_hydration_propagates_unsupported_format() {
        let mapper = Mapper::new(&NoFileResolver);
        let input = raw_object(json!({
            "id": "o1",
            "properties": [{"key": "x", "format": "relation"}]
        }));
        let err = mapper.map_object(input, Hydration::Full).await.unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(ref f) if f == "relation"));
    }

    #[test]
    fn test_map_property_normalizes_tags() {
        let property = map_property(raw_property(json!({
            "id": "p1",
            "key": "status",
            "name": "Status",
            "format": "select",
            "select": {"id": "t1", "name": "", "color": "purple"}
        })))
        .unwrap();
        assert_eq!(property.icon.asset(), Some("icons/property/select.svg"));
        let Some(PropertyValue::Select(tag)) = property.value else {
            panic!("expected select value");
        };
        assert_eq!(tag.name, "Untitled");
        assert_eq!(tag.color, "#ab50cc");

        let property = map_property(raw_property(json!({
            "key": "labels",
            "format": "multi_select",
            "multi_select": [
                {"id": "a", "name": "A", "color": "lime"},
                {"id": "b", "name": "B", "color": "#123456"}
            ]
        })))
        .unwrap();
        let Some(PropertyValue::MultiSelect(tags)) = property.value else {
            panic!("expected multi_select value");
        };
        assert_eq!(tags[0].color, "#5dd400");
        assert_eq!(tags[1].color, "#123456");
    }

    #[test]
    fn test_map_property_rejects_mismatched_slot() {
        let err = map_property(raw_property(json!({
            "key": "due",
            "format": "date",
            "text": "tomorrow"
        })))
        .unwrap_err();
        match err {
            Error::FormatMismatch { key, format, found } => {
                assert_eq!(key, "due");
                assert_eq!(format, "date");
                assert_eq!(found, "text");
            }
            other => panic!("expected FormatMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_map_property_definition_has_no_value() {
        let property =
            map_property(raw_property(json!({"key": "phone", "name": "Phone", "format": "phone"})))
                .unwrap();
        assert!(property.value.is_none());
        assert_eq!(property.format, PropertyFormat::Phone);
    }

    #[test]
    fn test_map_property_unknown_format() {
        let err = map_property(raw_property(json!({"key": "k", "format": "formula"}))).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn test_member_icon_is_circular_with_person_fallback() {
        let mapper = Mapper::new(&NoFileResolver);
        let m: RawMember = serde_json::from_value(json!({
            "id": "m1",
            "name": "Ada",
            "icon": {"format": "file", "file": "bafy"},
            "global_name": "ada.any",
            "role": "owner"
        }))
        .unwrap();
        let member = mapper.map_member("s1", m).await;
        assert_eq!(member.icon.source, IconSource::Glyph(Glyph::PersonCircle));
        assert_eq!(member.icon.mask, IconMask::Circle);
        assert_eq!(member.space_id, "s1");
        assert_eq!(member.role, "owner");

        let m: RawMember = serde_json::from_value(json!({
            "id": "m2",
            "icon": {"format": "emoji", "emoji": "🐙"}
        }))
        .unwrap();
        assert_eq!(mapper.map_member("s1", m).await.icon.mask, IconMask::Circle);
    }

    #[tokio::test]
    async fn test_map_type_propagates_unsupported_format() {
        let mapper = Mapper::new(&NoFileResolver);
        let t: RawType = serde_json::from_value(json!({
            "id": "t1",
            "properties": [{"key": "x", "format": "text"}, {"key": "y", "format": "rollup"}]
        }))
        .unwrap();
        assert!(mapper.map_type("s", t).await.is_err());
    }

    #[tokio::test]
    async fn test_embedded_type_ignores_property_definitions() {
        let mapper = Mapper::new(&NoFileResolver);
        let input = raw_object(json!({
            "id": "o1",
            "type": {"id": "t1", "key": "ot-page", "properties": [{"key": "y", "format": "rollup"}]}
        }));
        let object = mapper.map_object(input, Hydration::Summary).await.unwrap();
        let object_type = object.object_type.unwrap();
        assert!(object_type.properties.is_empty());
        assert_eq!(object_type.icon.source, IconSource::Glyph(Glyph::Type));
    }

    #[tokio::test]
    async fn test_map_page_keeps_order_and_has_more() {
        let mapper = Mapper::new(&NoFileResolver);
        let items: Vec<RawEntity> = serde_json::from_value(json!([
            {"object": "object", "id": "b", "space_id": "s"},
            {"object": "object", "id": "a", "space_id": "s"},
            {"object": "member", "id": "m"}
        ]))
        .unwrap();
        let page = mapper
            .map_page(
                "s",
                Page {
                    items,
                    has_more: true,
                },
                Hydration::Summary,
            )
            .await
            .unwrap();
        assert!(page.has_more);
        let ids: Vec<_> = page
            .items
            .iter()
            .map(|e| match e {
                DisplayEntity::Object(o) => o.id.clone(),
                DisplayEntity::Member(m) => m.id.clone(),
                _ => String::new(),
            })
            .collect();
        assert_eq!(ids, vec!["b", "a", "m"]);
    }
}
