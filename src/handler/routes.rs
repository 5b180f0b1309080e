//! Route table for the squirrel resource
//!
//! Resolves a (method, path) pair into one action, once per request.

use hyper::Method;

/// Collection path segment
pub const COLLECTION: &str = "squirrels";

/// Resolved resource action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    /// `GET /squirrels`
    List,
    /// `POST /squirrels`
    Create,
    /// `GET /squirrels/{id}`
    Retrieve(&'a str),
    /// `PUT /squirrels/{id}`
    Update(&'a str),
    /// `DELETE /squirrels/{id}`
    Delete(&'a str),
    /// Anything else, including the singular `/squirrel/...` prefix
    NotFound,
}

impl<'a> Route<'a> {
    pub fn resolve(method: &Method, path: &'a str) -> Self {
        let Some(rest) = path.strip_prefix('/') else {
            return Self::NotFound;
        };
        let segments: Vec<&'a str> = rest.split('/').collect();

        match (method, segments.as_slice()) {
            (&Method::GET, [COLLECTION]) => Self::List,
            (&Method::POST, [COLLECTION]) => Self::Create,
            (&Method::GET, [COLLECTION, id]) if !id.is_empty() => Self::Retrieve(*id),
            (&Method::PUT, [COLLECTION, id]) if !id.is_empty() => Self::Update(*id),
            (&Method::DELETE, [COLLECTION, id]) if !id.is_empty() => Self::Delete(*id),
            _ => Self::NotFound,
        }
    }

    /// Short action name used in access logs
    pub const fn action(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Retrieve(_) => "retrieve",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
            Self::NotFound => "not_found",
        }
    }

    /// Whether the action reads a form body
    pub const fn takes_form(&self) -> bool {
        matches!(self, Self::Create | Self::Update(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_routes() {
        assert_eq!(Route::resolve(&Method::GET, "/squirrels"), Route::List);
        assert_eq!(Route::resolve(&Method::POST, "/squirrels"), Route::Create);
    }

    #[test]
    fn test_member_routes() {
        assert_eq!(
            Route::resolve(&Method::GET, "/squirrels/1"),
            Route::Retrieve("1")
        );
        assert_eq!(
            Route::resolve(&Method::PUT, "/squirrels/1"),
            Route::Update("1")
        );
        assert_eq!(
            Route::resolve(&Method::DELETE, "/squirrels/abc"),
            Route::Delete("abc")
        );
    }

    #[test]
    fn test_singular_prefix_is_not_found() {
        for method in [Method::GET, Method::PUT, Method::DELETE, Method::POST] {
            assert_eq!(Route::resolve(&method, "/squirrel/1"), Route::NotFound);
            assert_eq!(Route::resolve(&method, "/squirrel"), Route::NotFound);
        }
    }

    #[test]
    fn test_malformed_shapes() {
        assert_eq!(Route::resolve(&Method::GET, "/squirrels/"), Route::NotFound);
        assert_eq!(Route::resolve(&Method::GET, "/squirrels/1/2"), Route::NotFound);
        assert_eq!(Route::resolve(&Method::GET, "/"), Route::NotFound);
        assert_eq!(Route::resolve(&Method::GET, "squirrels"), Route::NotFound);
        assert_eq!(Route::resolve(&Method::GET, "/squirrelsx"), Route::NotFound);
    }

    #[test]
    fn test_method_mismatch_is_not_found() {
        assert_eq!(Route::resolve(&Method::DELETE, "/squirrels"), Route::NotFound);
        assert_eq!(Route::resolve(&Method::POST, "/squirrels/1"), Route::NotFound);
        assert_eq!(Route::resolve(&Method::PATCH, "/squirrels/1"), Route::NotFound);
    }

    #[test]
    fn test_action_names() {
        assert_eq!(Route::List.action(), "list");
        assert_eq!(Route::Update("1").action(), "update");
        assert!(Route::Create.takes_form());
        assert!(!Route::Delete("1").takes_form());
    }
}
