//! Template construction.
//!
//! `TemplateBuilder` owns the directive creation counter. Every directive
//! built through one builder gets a strictly larger creation order than the
//! ones before it; two builders never share a counter.

use crate::action::Action;
use crate::convert::ValueType;
use crate::error::TemplateError;
use crate::path::Path;
use crate::template::{Directive, Template};

/// Owner of the creation-order counter for one template tree.
#[derive(Debug, Default)]
pub struct TemplateBuilder {
    next_order: u64,
}

impl TemplateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a directive. Its creation order is allocated now, so nested
    /// directives built while filling in this one's action sort after it.
    pub fn directive(&mut self) -> DirectiveBuilder {
        self.next_order += 1;
        DirectiveBuilder {
            directive: Directive {
                key: None,
                index: None,
                value_type: None,
                location: None,
                root_location: None,
                action: None,
                creation_order: self.next_order,
            },
        }
    }

    /// Shorthand for a plain key extraction.
    pub fn key(&mut self, key: impl Into<String>) -> Template {
        Template::from(self.directive().key(key).into_directive())
    }

    /// Shorthand for a scope-setting directive with a `location` action.
    pub fn location(&mut self, path: impl Into<Path>) -> Template {
        Template::from(
            self.directive()
                .action(Action::location(path))
                .into_directive(),
        )
    }

    /// Orders handed out so far.
    pub fn issued(&self) -> u64 {
        self.next_order
    }
}

/// A directive under construction.
#[derive(Debug, Clone)]
pub struct DirectiveBuilder {
    directive: Directive,
}

impl DirectiveBuilder {
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.directive.key = Some(key.into());
        self
    }

    pub fn index(mut self, index: usize) -> Self {
        self.directive.index = Some(index);
        self
    }

    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.directive.value_type = Some(value_type);
        self
    }

    pub fn location(mut self, path: impl Into<Path>) -> Self {
        self.directive.location = Some(path.into());
        self
    }

    pub fn root_location(mut self, path: impl Into<Path>) -> Self {
        self.directive.root_location = Some(path.into());
        self
    }

    pub fn action(mut self, action: Action) -> Self {
        self.directive.action = Some(action);
        self
    }

    /// Finish the directive as a template node.
    pub fn build(self) -> Result<Template, TemplateError> {
        self.finish().map(Template::from)
    }

    /// Finish the directive, rejecting `location` together with
    /// `root_location`.
    pub fn finish(self) -> Result<Directive, TemplateError> {
        let d = self.directive;
        if let (Some(location), Some(root_location)) = (&d.location, &d.root_location) {
            return Err(TemplateError::ConflictingLocations {
                creation_order: d.creation_order,
                location: location.clone(),
                root_location: root_location.clone(),
            });
        }
        Ok(d)
    }

    // Only for setters that cannot produce a conflicting location.
    fn into_directive(self) -> Directive {
        self.directive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;

    #[test]
    fn creation_order_strictly_increases() {
        let mut b = TemplateBuilder::new();
        let first = b.directive().key("a").finish().unwrap();
        let second = b.directive().index(0).finish().unwrap();
        let third = b.directive().key("c").finish().unwrap();
        assert!(first.creation_order() < second.creation_order());
        assert!(second.creation_order() < third.creation_order());
        assert_eq!(b.issued(), 3);
    }

    #[test]
    fn builders_do_not_share_counters() {
        let mut a = TemplateBuilder::new();
        let mut b = TemplateBuilder::new();
        let _ = a.key("x");
        let _ = a.key("y");
        let d = b.directive().key("z").finish().unwrap();
        assert_eq!(d.creation_order(), 1);
    }

    #[test]
    fn outer_directive_orders_before_nested_ones() {
        let mut b = TemplateBuilder::new();
        let outer = b.directive();
        let item = Template::mapping([("x", b.key("n"))]);
        let outer = outer.action(Action::for_list(item)).finish().unwrap();
        assert_eq!(outer.creation_order(), 1);
        let Some(Action::ForList(for_list)) = outer.action() else {
            panic!("expected for_list");
        };
        let Template::Mapping(entries) = for_list.item_template() else {
            panic!("expected mapping");
        };
        assert_eq!(entries["x"].as_directive().unwrap().creation_order(), 2);
    }

    #[test]
    fn both_locations_is_a_construction_error() {
        let pairs = [
            (path!["a"], path!["b"]),
            (path![0], path!["x", 1]),
            (path!["a", "b", "c"], path![2]),
        ];
        let mut b = TemplateBuilder::new();
        for (location, root_location) in pairs {
            let err = b
                .directive()
                .key("k")
                .location(location.clone())
                .root_location(root_location.clone())
                .build()
                .unwrap_err();
            assert!(matches!(
                err,
                TemplateError::ConflictingLocations { location: l, root_location: r, .. }
                    if l == location && r == root_location
            ));
        }
    }

    #[test]
    fn setters_fill_fields() {
        let mut b = TemplateBuilder::new();
        let d = b
            .directive()
            .key("price")
            .value_type(ValueType::Text)
            .location(path!["level", "level2"])
            .finish()
            .unwrap();
        assert_eq!(d.key(), Some("price"));
        assert_eq!(d.index(), None);
        assert_eq!(d.value_type().map(ValueType::name), Some("text"));
        assert_eq!(d.location(), Some(&path!["level", "level2"]));
        assert!(d.root_location().is_none());
        assert!(d.action().is_none());
    }
}
