//! 规制验证结果模型
//!
//! RAG 验证引擎针对渲染后的 HTML 返回的检查结论。
//! 每条 Finding 要么是"缺失项"要么是"错误值"，二者必居其一。

use serde::{Deserialize, Serialize};

/// 问题严重程度
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// 问题位置
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub selector: String,
    #[serde(default)]
    pub element_type: String,
}

/// 缺失项明细
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MissingItem {
    pub item: String,
    pub severity: Severity,
    pub message: String,
}

/// 错误值明细
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IncorrectValue {
    pub current_value: String,
    pub issue: String,
    pub severity: Severity,
    pub message: String,
}

/// 规制依据
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default)]
    pub regulation: String,
    #[serde(default)]
    pub guidance: String,
    #[serde(default)]
    pub sources: Vec<ReferenceSource>,
}

/// 依据来源
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReferenceSource {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub category: String,
}

/// 单条验证结论
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Finding {
    #[serde(default)]
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<MissingItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incorrect: Option<IncorrectValue>,
    #[serde(default)]
    pub reference: Reference,
}

impl Finding {
    /// 取本条结论的严重程度
    ///
    /// 契约上 missing / incorrect 恰有其一；两者都缺失时视为 Info。
    pub fn severity(&self) -> Severity {
        if let Some(m) = &self.missing {
            m.severity
        } else if let Some(i) = &self.incorrect {
            i.severity
        } else {
            Severity::Info
        }
    }
}

/// 验证结果
///
/// `total_errors` 由验证引擎给出，本系统原样透传，不做重算。
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub source_html: String,
    #[serde(default)]
    pub product_type: String,
    #[serde(default)]
    pub total_errors: u32,
    #[serde(default)]
    pub errors: Vec<Finding>,
}

impl ValidationResult {
    /// 严重程度为 error 的结论数量
    pub fn error_count(&self) -> u32 {
        self.count_by_severity(Severity::Error)
    }

    /// 严重程度为 warning 的结论数量
    pub fn warning_count(&self) -> u32 {
        self.count_by_severity(Severity::Warning)
    }

    fn count_by_severity(&self, severity: Severity) -> u32 {
        self.errors.iter().filter(|f| f.severity() == severity).count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> ValidationResult {
        let json = r#"{
            "product_name": "Fanta Orange",
            "source_html": "",
            "product_type": "Carbonated Soft Drink",
            "total_errors": 3,
            "errors": [
                {
                    "location": {"selector": "div.nutrition-facts", "element_type": "nutrition-facts"},
                    "missing": {"item": "Vitamin D", "severity": "error", "message": "Vitamin D is required"},
                    "reference": {
                        "regulation": "21 CFR 101.9(c)(8)(ii)",
                        "guidance": "Vitamin D, Calcium, Iron, and Potassium are required.",
                        "sources": [{"source": "FDA", "category": "regulation"}]
                    }
                },
                {
                    "location": {"selector": "div.nutrition-facts", "element_type": "nutrition-facts"},
                    "incorrect": {"current_value": "0g", "issue": "rounding", "severity": "warning", "message": "Round per FDA rules"},
                    "reference": {"regulation": "21 CFR 101.9", "guidance": "", "sources": []}
                },
                {
                    "location": {"selector": "div.ingredients", "element_type": "ingredients"},
                    "missing": {"item": "allergen statement", "severity": "error", "message": "Allergen statement missing"},
                    "reference": {"regulation": "FALCPA", "guidance": "", "sources": []}
                }
            ]
        }"#;
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_validation_response() {
        let result = sample_result();
        assert_eq!(result.product_name, "Fanta Orange");
        assert_eq!(result.total_errors, 3);
        assert_eq!(result.errors.len(), 3);
        assert_eq!(result.errors[0].severity(), Severity::Error);
        assert_eq!(result.errors[1].severity(), Severity::Warning);
    }

    #[test]
    fn test_severity_counts() {
        let result = sample_result();
        assert_eq!(result.error_count(), 2);
        assert_eq!(result.warning_count(), 1);
    }

    #[test]
    fn test_finding_without_detail_defaults_to_info() {
        let finding = Finding {
            location: Location::default(),
            missing: None,
            incorrect: None,
            reference: Reference::default(),
        };
        assert_eq!(finding.severity(), Severity::Info);
    }
}
