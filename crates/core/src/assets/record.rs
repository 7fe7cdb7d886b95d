use serde::{Deserialize, Serialize};

use super::AssetType;

/// A registered asset, stored as JSON under its `cid`.
///
/// Field declaration order is the serialized order (`cid`, `features`, `id`,
/// `type`), so encoding the same record always yields the same bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Content identifier; the storage key.
    pub cid: String,
    /// Opaque payload, typically a serialized feature vector.
    pub features: String,
    /// Logical identifier. Not required to be unique.
    pub id: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
}

impl Asset {
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// One page of a paginated read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Records in store iteration order.
    pub records: Vec<Asset>,
    pub fetched_records_count: i32,
    /// Store-issued token for the next page.
    pub bookmark: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Asset {
        Asset {
            cid: "CID_0".to_string(),
            features: "[]".to_string(),
            id: "ASSET_0".to_string(),
            asset_type: AssetType::Pdf,
        }
    }

    #[test]
    fn encodes_fields_in_stable_order() {
        let bytes = sample().to_bytes().unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"cid":"CID_0","features":"[]","id":"ASSET_0","type":"PDF"}"#
        );
    }

    #[test]
    fn decodes_stored_bytes() {
        let stored = br#"{"id":"ASSET_7","type":"PE","cid":"CID_7","features":"[0.5]"}"#;
        let asset = Asset::from_bytes(stored).unwrap();
        assert_eq!(asset.cid, "CID_7");
        assert_eq!(asset.asset_type, AssetType::Pe);
        assert_eq!(asset.features, "[0.5]");
    }

    #[test]
    fn decoding_rejects_unknown_type() {
        let stored = br#"{"cid":"c","features":"","id":"i","type":"EXE"}"#;
        assert!(Asset::from_bytes(stored).is_err());
    }

    #[test]
    fn decoding_rejects_missing_fields() {
        assert!(Asset::from_bytes(br#"{"cid":"c"}"#).is_err());
    }

    #[test]
    fn page_uses_camel_case_wire_names() {
        let page = Page {
            records: vec![],
            fetched_records_count: 0,
            bookmark: "CID_4".to_string(),
        };
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["fetchedRecordsCount"], 0);
        assert_eq!(json["bookmark"], "CID_4");
        assert!(json["records"].as_array().unwrap().is_empty());
    }
}
