//! Processing order for mapping entries.
//!
//! Directive entries run in ascending creation order. Every other entry
//! runs after all directives, in ascending key order. The scope-setting
//! entry, when present, is moved to the front because it may rebind the
//! cursor its siblings read from.
//!
//! Orders are cached per run, keyed by the mapping node's address. The
//! template is borrowed for the whole run, so an address cannot be reused
//! by another node while the cache is alive.

use std::collections::HashMap;
use std::rc::Rc;

use reshape_core::{Directive, Mapping, Template};

/// Compute the processing order of `mapping`'s keys.
pub fn compute_order<'t>(mapping: &'t Mapping, scope_key: &str) -> Vec<&'t str> {
    let after_directives = mapping
        .values()
        .filter_map(Template::as_directive)
        .map(Directive::creation_order)
        .max()
        .unwrap_or(0)
        .saturating_add(1);

    // BTreeMap iteration is key-ordered and the sort is stable, so ties keep
    // key order.
    let mut weighted: Vec<(u64, &'t str)> = mapping
        .iter()
        .map(|(key, node)| {
            let weight = node
                .as_directive()
                .map_or(after_directives, Directive::creation_order);
            (weight, key.as_str())
        })
        .collect();
    weighted.sort_by_key(|(weight, _)| *weight);

    let mut order: Vec<&'t str> = weighted.into_iter().map(|(_, key)| key).collect();
    if let Some(pos) = order.iter().position(|key| *key == scope_key) {
        let key = order.remove(pos);
        order.insert(0, key);
    }
    order
}

/// Run-scoped cache of mapping orders.
#[derive(Debug, Default)]
pub struct OrderCache<'t> {
    orders: HashMap<*const Mapping, Rc<[&'t str]>>,
}

impl<'t> OrderCache<'t> {
    pub fn new() -> Self {
        OrderCache {
            orders: HashMap::new(),
        }
    }

    /// The order for `mapping`, computed on first use.
    pub fn order(&mut self, mapping: &'t Mapping, scope_key: &str) -> Rc<[&'t str]> {
        let id: *const Mapping = mapping;
        if let Some(order) = self.orders.get(&id) {
            tracing::trace!(entries = order.len(), "mapping order cache hit");
            return Rc::clone(order);
        }
        let order: Rc<[&'t str]> = compute_order(mapping, scope_key).into();
        tracing::debug!(order = ?order, "mapping order computed");
        self.orders.insert(id, Rc::clone(&order));
        order
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reshape_core::{Action, TemplateBuilder};

    fn entries(template: &Template) -> &Mapping {
        match template {
            Template::Mapping(m) => m,
            other => panic!("expected mapping, got {}", other.kind()),
        }
    }

    #[test]
    fn directives_by_creation_then_literals_by_key() {
        let mut b = TemplateBuilder::new();
        let first = b.key("first");
        let second = b.key("second");
        let t = Template::mapping([
            ("z", first),
            ("b_literal", Template::from(2)),
            ("a", second),
            ("a_literal", Template::from(1)),
        ]);
        assert_eq!(
            compute_order(entries(&t), "amap"),
            vec!["z", "a", "a_literal", "b_literal"]
        );
    }

    #[test]
    fn scope_key_goes_first_even_when_created_last() {
        let mut b = TemplateBuilder::new();
        let price = b.key("tcPrice");
        let title = b.key("policyName");
        let scope = b.location("level");
        let t = Template::mapping([
            ("price", price),
            ("title", title),
            ("amap", scope),
            ("sell_status", Template::from(2)),
        ]);
        assert_eq!(
            compute_order(entries(&t), "amap"),
            vec!["amap", "price", "title", "sell_status"]
        );
    }

    #[test]
    fn custom_scope_key() {
        let mut b = TemplateBuilder::new();
        let t = Template::mapping([
            ("a", b.key("a")),
            ("$scope", b.location("level")),
            ("amap", Template::from("plain literal")),
        ]);
        assert_eq!(
            compute_order(entries(&t), "$scope"),
            vec!["$scope", "a", "amap"]
        );
    }

    #[test]
    fn literal_only_mapping_is_key_ordered() {
        let t = Template::mapping([("c", 3), ("a", 1), ("b", 2)]);
        assert_eq!(compute_order(entries(&t), "amap"), vec!["a", "b", "c"]);
    }

    #[test]
    fn cache_computes_once_per_node() {
        let mut b = TemplateBuilder::new();
        let item = Template::mapping([("x", b.key("n")), ("y", b.key("m"))]);
        let outer = b
            .directive()
            .action(Action::for_list(item))
            .finish()
            .unwrap();
        let Some(Action::ForList(for_list)) = outer.action() else {
            panic!("expected for_list");
        };
        let mapping = entries(for_list.item_template());

        let mut cache = OrderCache::new();
        let first = cache.order(mapping, "amap");
        let second = cache.order(mapping, "amap");
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!(&*first, &["x", "y"]);
    }

    #[test]
    fn distinct_nodes_with_equal_content_get_separate_entries() {
        let a = Template::mapping([("k", 1)]);
        let b = Template::mapping([("k", 1)]);
        let mut cache = OrderCache::new();
        cache.order(entries(&a), "amap");
        cache.order(entries(&b), "amap");
        assert_eq!(cache.len(), 2);
    }
}
