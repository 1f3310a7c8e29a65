//! Registered names and versions

/// Fully qualified registered name of an entity bound as `symbol` in `module`.
///
/// Every kind uses the same name; a workflow and its default launch plan
/// share it since the registry keeps them apart by resource type.
pub fn fqdn(module: &str, symbol: &str) -> String {
    format!("{}.{}", module, symbol)
}

/// The tag of a container image reference, used as the registration version.
///
/// `registry:5000/team/etl:abc123` gives `abc123`. A digest suffix is
/// ignored; an untagged image gives `None`.
pub fn version_from_image(image: &str) -> Option<String> {
    let last = image.rsplit('/').next().unwrap_or(image);
    let name_and_tag = last.split('@').next().unwrap_or(last);
    match name_and_tag.rsplit_once(':') {
        Some((name, tag)) if !name.is_empty() && !tag.is_empty() => Some(tag.to_string()),
        _ => None,
    }
}
