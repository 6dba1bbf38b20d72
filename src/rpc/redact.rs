use serde_json::Value;

const REDACTED: &str = "[REDACTED]";

fn is_sensitive(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key.contains("password") || key.contains("token") || key == "authorization"
}

/// Returns a copy of `value` with credential-bearing fields replaced, for
/// logging forwarded payloads without leaking secrets. Only scalar leaves
/// are replaced; a sensitive-named key holding an object or array is
/// recursed into so nested non-secret fields stay visible.
pub fn redact(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| {
                    let v = if is_sensitive(k) && !v.is_object() && !v.is_array() {
                        Value::String(REDACTED.into())
                    } else {
                        redact(v)
                    };
                    (k.clone(), v)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn redacts_password_and_token_fields() {
        let payload = json!({
            "email": "a@x.com",
            "password": "hunter2",
            "refreshToken": "eyJ...",
            "authorization": "Bearer abc",
        });
        let clean = redact(&payload);
        assert_eq!(clean["email"], "a@x.com");
        assert_eq!(clean["password"], REDACTED);
        assert_eq!(clean["refreshToken"], REDACTED);
        assert_eq!(clean["authorization"], REDACTED);
    }

    #[test]
    fn redacts_nested_objects_and_arrays() {
        let payload = json!({
            "changePassword": { "currentPassword": "a", "newPassword": "b" },
            "batch": [{ "accessToken": "t" }],
        });
        let clean = redact(&payload);
        assert_eq!(clean["changePassword"]["currentPassword"], REDACTED);
        assert_eq!(clean["changePassword"]["newPassword"], REDACTED);
        assert_eq!(clean["batch"][0]["accessToken"], REDACTED);
    }

    #[test]
    fn sensitive_named_containers_keep_their_structure() {
        let payload = json!({
            "changePassword": { "currentPassword": "a", "userId": "u1" },
            "tokens": { "accessToken": "t", "expiresIn": 900 },
        });
        let clean = redact(&payload);
        assert_eq!(clean["changePassword"]["currentPassword"], REDACTED);
        assert_eq!(clean["changePassword"]["userId"], "u1");
        assert_eq!(clean["tokens"]["accessToken"], REDACTED);
        assert_eq!(clean["tokens"]["expiresIn"], 900);
    }

    #[test]
    fn leaves_plain_values_alone() {
        let payload = json!({ "servings": 4, "name": "Pho" });
        assert_eq!(redact(&payload), payload);
    }
}
