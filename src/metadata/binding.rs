//! Binding descriptors and HTTP verbs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the synthetic HTTP trigger input binding
pub const TRIGGER_BINDING_NAME: &str = "req";

/// Name denoting the function's return value
pub const RETURN_BINDING_NAME: &str = "$return";

pub const HTTP_TRIGGER_TYPE: &str = "httpTrigger";
pub const HTTP_OUTPUT_TYPE: &str = "http";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpVerb {
    /// Maps a route-registration method name to its verb
    ///
    /// Only the exact method names are recognised; everything else yields `None`.
    pub fn from_method_name(method: &str) -> Option<Self> {
        match method {
            "MapGet" => Some(HttpVerb::Get),
            "MapPost" => Some(HttpVerb::Post),
            "MapPut" => Some(HttpVerb::Put),
            "MapDelete" => Some(HttpVerb::Delete),
            "MapPatch" => Some(HttpVerb::Patch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Delete => "DELETE",
            HttpVerb::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingDirection {
    In,
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthLevel {
    Anonymous,
    Function,
    Admin,
}

/// One input or output connection a function declares to its host
///
/// Field order here is the serialized field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingDescriptor {
    pub name: String,

    #[serde(rename = "type")]
    pub binding_type: String,

    pub direction: BindingDirection,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_level: Option<AuthLevel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methods: Option<Vec<String>>,
}

impl BindingDescriptor {
    /// Anonymous HTTP trigger accepting a single verb
    pub fn http_trigger(verb: HttpVerb) -> Self {
        Self {
            name: TRIGGER_BINDING_NAME.to_string(),
            binding_type: HTTP_TRIGGER_TYPE.to_string(),
            direction: BindingDirection::In,
            auth_level: Some(AuthLevel::Anonymous),
            methods: Some(vec![verb.as_str().to_string()]),
        }
    }

    /// HTTP response bound to the return value
    pub fn http_return() -> Self {
        Self {
            name: RETURN_BINDING_NAME.to_string(),
            binding_type: HTTP_OUTPUT_TYPE.to_string(),
            direction: BindingDirection::Out,
            auth_level: None,
            methods: None,
        }
    }

    /// Compact JSON form embedded in generated source
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        get = { "MapGet", Some(HttpVerb::Get) },
        post = { "MapPost", Some(HttpVerb::Post) },
        put = { "MapPut", Some(HttpVerb::Put) },
        delete = { "MapDelete", Some(HttpVerb::Delete) },
        patch = { "MapPatch", Some(HttpVerb::Patch) },
        head = { "MapHead", None },
        lowercase = { "mapget", None },
        map_methods = { "MapMethods", None },
        empty = { "", None },
    )]
    fn test_verb_mapping(method: &str, expected: Option<HttpVerb>) {
        assert_eq!(HttpVerb::from_method_name(method), expected);
    }

    #[test]
    fn test_verb_tokens_are_uppercase() {
        assert_eq!(HttpVerb::Get.as_str(), "GET");
        assert_eq!(HttpVerb::Delete.to_string(), "DELETE");
        assert_eq!(serde_json::to_string(&HttpVerb::Patch).unwrap(), "\"PATCH\"");
    }

    #[test]
    fn test_trigger_serialization() {
        let json = BindingDescriptor::http_trigger(HttpVerb::Get).to_json().unwrap();
        assert_eq!(
            json,
            r#"{"name":"req","type":"httpTrigger","direction":"In","authLevel":"Anonymous","methods":["GET"]}"#
        );
    }

    #[test]
    fn test_return_serialization() {
        let json = BindingDescriptor::http_return().to_json().unwrap();
        assert_eq!(json, r#"{"name":"$return","type":"http","direction":"Out"}"#);
    }

    #[test]
    fn test_descriptor_survives_text_form() {
        for binding in [
            BindingDescriptor::http_trigger(HttpVerb::Put),
            BindingDescriptor::http_return(),
        ] {
            let parsed = BindingDescriptor::from_json(&binding.to_json().unwrap()).unwrap();
            assert_eq!(parsed, binding);
        }
    }

    #[test]
    fn test_descriptor_with_quotes_survives_text_form() {
        let binding = BindingDescriptor {
            name: "say \"hi\"".to_string(),
            ..BindingDescriptor::http_return()
        };

        let json = binding.to_json().unwrap();
        assert!(json.contains(r#"say \"hi\""#));
        assert_eq!(BindingDescriptor::from_json(&json).unwrap(), binding);
    }
}
