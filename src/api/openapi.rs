use super::handlers::{booklets, hello};
use utoipa::openapi::{Contact, InfoBuilder, License, OpenApiBuilder, Tag};
use utoipa_axum::{router::OpenApiRouter, routes};

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Reuse the same router wiring and only return the generated OpenAPI spec.
    let (_router, openapi) = api_router().split_for_parts();
    openapi
}

/// Build the router that also drives the `OpenAPI` document.
///
/// Add new endpoints here via `.routes(routes!(...))` and to
/// [`super::routes::ROUTES`]; a test keeps the two in agreement.
/// The `/api/auth/*` pass-through and the page shells are not documented.
pub(crate) fn api_router() -> OpenApiRouter {
    let mut doc = cargo_openapi();
    doc.tags = Some(api_tags());

    OpenApiRouter::with_openapi(doc)
        .routes(routes!(hello::hello))
        .routes(routes!(booklets::booklets))
}

fn api_tags() -> Vec<Tag> {
    let mut vestly_tag = Tag::new("vestly");
    vestly_tag.description = Some("Gateway liveness".to_string());

    let mut booklets_tag = Tag::new("booklets");
    booklets_tag.description = Some("Booklet listing (not scoped to the caller)".to_string());

    vec![vestly_tag, booklets_tag]
}

fn cargo_openapi() -> utoipa::openapi::OpenApi {
    // Use Cargo.toml metadata instead of the utoipa-axum crate info defaults.
    let mut info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(optional_str(env!("CARGO_PKG_DESCRIPTION")))
        .build();

    info.contact = cargo_contact();
    info.license = cargo_license();

    OpenApiBuilder::new().info(info).build()
}

fn cargo_contact() -> Option<Contact> {
    // Cargo authors are `;` separated and may include "Name <email>".
    let authors = env!("CARGO_PKG_AUTHORS");
    let primary = authors.split(';').next().map(str::trim)?;
    if primary.is_empty() {
        return None;
    }

    let (name, email) = parse_author(primary);
    if name.is_none() && email.is_none() {
        return None;
    }

    let mut contact = Contact::new();
    contact.name = name.map(str::to_string);
    contact.email = email.map(str::to_string);
    Some(contact)
}

fn cargo_license() -> Option<License> {
    let identifier = optional_str(env!("CARGO_PKG_LICENSE"))?;
    let mut license = License::new(identifier);
    license.identifier = Some(identifier.to_string());
    Some(license)
}

fn optional_str(value: &'static str) -> Option<&'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_author(author: &str) -> (Option<&str>, Option<&str>) {
    match (author.find('<'), author.rfind('>')) {
        (Some(start), Some(end)) if start < end => {
            let name = optional(author[..start].trim());
            let email = optional(author[start + 1..end].trim());
            (name, email)
        }
        _ => (optional(author), None),
    }
}

fn optional(value: &str) -> Option<&str> {
    if value.is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::routes::{AUTH_PATTERN, ROUTES};

    #[test]
    fn parse_author_splits_name_and_email() {
        assert_eq!(
            parse_author("Team Vestly <team@vestly.app>"),
            (Some("Team Vestly"), Some("team@vestly.app"))
        );
        assert_eq!(parse_author("Solo"), (Some("Solo"), None));
        assert_eq!(parse_author("<only@mail>"), (None, Some("only@mail")));
    }

    #[test]
    fn openapi_uses_cargo_metadata() {
        let doc = openapi();
        assert_eq!(doc.info.title, env!("CARGO_PKG_NAME"));
        assert_eq!(doc.info.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(
            doc.info.license.map(|l| l.name),
            Some("BSD-3-Clause".to_string())
        );
    }

    #[test]
    fn openapi_lists_operation_tags() {
        let doc = openapi();
        let tags = doc.tags.unwrap_or_default();
        let names: Vec<&str> = tags.iter().map(|tag| tag.name.as_str()).collect();
        assert_eq!(names, ["vestly", "booklets"]);
        assert!(
            tags.iter()
                .find(|tag| tag.name == "booklets")
                .and_then(|tag| tag.description.as_deref())
                .is_some_and(|text| text.contains("not scoped"))
        );
    }

    #[test]
    fn documented_paths_match_route_table() {
        let doc = openapi();
        let mut documented: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        documented.sort_unstable();

        let mut table: Vec<&str> = ROUTES
            .iter()
            .filter(|spec| spec.documented)
            .map(|spec| spec.pattern)
            .collect();
        table.sort_unstable();

        assert_eq!(documented, table);
        assert!(!documented.contains(&AUTH_PATTERN));
    }
}
