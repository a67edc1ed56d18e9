//! Key sets produced by backend serialization.
//!
//! Keys are `/` separated names, values are strings. The map is ordered by
//! key name, which is also the order array indices are written in.

use std::collections::BTreeMap;

use chain_meta::PluginSpec;

/// Ordered key name to value mapping.
pub type KeySet = BTreeMap<String, String>;

/// Array element name for `index`: `#0` .. `#9`, `#_10` .. `#_99`, `#__100` ..
///
/// One underscore per digit after the first keeps lexicographic order equal
/// to numeric order.
pub fn array_index(index: usize) -> String {
    let digits = index.to_string();
    format!("#{}{}", "_".repeat(digits.len() - 1), digits)
}

/// Escape a value so it can be used as a single key name segment.
pub fn escape_segment(segment: &str) -> String {
    segment.replace('\\', "\\\\").replace('/', "\\/")
}

/// Write `plugins` in chain order as array elements below `base`.
pub(crate) fn serialize_plugins(base: &str, plugins: &[PluginSpec], ret: &mut KeySet) {
    for (index, plugin) in plugins.iter().enumerate() {
        let element = format!("{}/{}", base, array_index(index));
        ret.insert(element.clone(), plugin.full_name());
        ret.insert(format!("{}/name", element), plugin.name().to_string());
        ret.insert(format!("{}/ref", element), plugin.ref_name().to_string());
        for (key, value) in plugin.config() {
            ret.insert(format!("{}/config/{}", element, key), value.clone());
        }
    }
}
