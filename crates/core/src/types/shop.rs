//! Partner shop record.

use serde::{Deserialize, Deserializer, Serialize};

use super::{Phone, ShopId};

/// A partner store as served by the shop data service.
///
/// `kind` is the category label, serialized as `"type"` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    pub id: ShopId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Thumbnail URI.
    #[serde(default)]
    pub image: String,
    /// Free text, only shown in the detail view.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub verified: bool,
    /// Contact number; `None` suppresses the contact panel.
    #[serde(default, deserialize_with = "deserialize_optional_phone")]
    pub phone: Option<Phone>,
}

impl Shop {
    /// Whether the shop exposes a contact number.
    #[must_use]
    pub const fn has_contact(&self) -> bool {
        self.phone.is_some()
    }
}

/// Only a blank number is absent; free-form entries are kept as written.
fn deserialize_optional_phone<'de, D>(deserializer: D) -> Result<Option<Phone>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| Phone::from_wire(&s)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_record() {
        let json = r#"{
            "id": 7,
            "name": "Boutique X",
            "type": "Épicerie",
            "image": "https://cdn.example.com/x.jpg",
            "description": "Produits locaux",
            "verified": true,
            "phone": "+225 07 00 00 00 00"
        }"#;

        let shop: Shop = serde_json::from_str(json).unwrap();
        assert_eq!(shop.id, ShopId::new(7));
        assert_eq!(shop.kind, "Épicerie");
        assert!(shop.verified);
        assert_eq!(shop.phone.unwrap().as_str(), "2250700000000");
    }

    #[test]
    fn test_deserialize_minimal_record() {
        let json = r#"{"id": 1, "name": "A", "type": "Mode"}"#;
        let shop: Shop = serde_json::from_str(json).unwrap();
        assert!(!shop.verified);
        assert!(shop.description.is_empty());
        assert!(!shop.has_contact());
    }

    #[test]
    fn test_blank_phone_is_absent() {
        for phone in [r#""""#, r#""   ""#, "null"] {
            let json = format!(r#"{{"id": 1, "name": "A", "type": "Mode", "phone": {phone}}}"#);
            let shop: Shop = serde_json::from_str(&json).unwrap();
            assert!(!shop.has_contact(), "phone {phone} should be absent");
        }
    }

    #[test]
    fn test_free_form_phone_keeps_contact() {
        for phone in ["12345", "07 00 00 00 00 poste 2", "+225 07 00 00 00 00 / 01", "n/a"] {
            let json = format!(r#"{{"id": 1, "name": "A", "type": "Mode", "phone": "{phone}"}}"#);
            let shop: Shop = serde_json::from_str(&json).unwrap();
            assert!(shop.has_contact(), "phone {phone} should be kept");
            assert_eq!(shop.phone.unwrap().to_string(), phone);
        }
    }

    #[test]
    fn test_serialize_uses_type_key() {
        let shop = Shop {
            id: ShopId::new(3),
            name: "C".to_string(),
            kind: "Beauté".to_string(),
            image: String::new(),
            description: String::new(),
            verified: false,
            phone: None,
        };
        let value = serde_json::to_value(&shop).unwrap();
        assert_eq!(value["type"], "Beauté");
        assert!(value.get("kind").is_none());
    }
}
