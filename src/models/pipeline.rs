//! 处理流水线 DTO
//!
//! 对应远程 Food Label 引擎固定的四阶段流水线：
//! OCR → 结构化 → 翻译 → HTML 渲染

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 上传的图片文件
#[derive(Clone, Debug)]
pub struct ImageFile {
    /// 原始文件名
    pub file_name: String,
    /// 文件内容
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// 根据文件头判断是否为支持的图片格式（PNG / JPEG / WebP）
    pub fn is_supported_image(&self) -> bool {
        let b = &self.bytes;
        if b.len() < 12 {
            return false;
        }
        let png = b.starts_with(&[0x89, 0x50, 0x4E, 0x47]);
        let jpeg = b.starts_with(&[0xFF, 0xD8, 0xFF]);
        let webp = b.starts_with(b"RIFF") && &b[8..12] == b"WEBP";
        png || jpeg || webp
    }
}

/// 单次流水线处理请求
///
/// 构造后不可变；目标国家代码在构造时统一转为大写。
#[derive(Clone, Debug)]
pub struct ProcessingRequest {
    pub image: ImageFile,
    pub target_country: String,
    pub generate_html: bool,
}

impl ProcessingRequest {
    pub fn new(image: ImageFile, target_country: &str, generate_html: bool) -> Self {
        Self {
            image,
            target_country: target_country.trim().to_uppercase(),
            generate_html,
        }
    }
}

/// OCR 结果
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OcrResult {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub texts: Vec<String>,
}

/// 结构化结果
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StructureResult {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub data: Value,
}

/// 翻译结果
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TranslatedData {
    #[serde(default)]
    pub source_language: String,
    #[serde(default)]
    pub target_country: String,
    #[serde(default)]
    pub translated_data: LabelData,
}

/// 翻译后的标签数据
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LabelData {
    #[serde(default)]
    pub product: ProductInfo,
    #[serde(default)]
    pub nutrition: NutritionFacts,
    #[serde(default)]
    pub additional: AdditionalInfo,
}

/// 产品信息
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProductInfo {
    #[serde(rename = "type", default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub best_before: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub allergens: Vec<String>,
}

/// 营养成分表
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NutritionFacts {
    #[serde(default)]
    pub serving_size: Option<String>,
    #[serde(default)]
    pub servings_per_container: Option<String>,
    #[serde(default)]
    pub calories: Option<String>,
    #[serde(default)]
    pub total_fat: Option<NutrientValue>,
    #[serde(default)]
    pub saturated_fat: Option<NutrientValue>,
    #[serde(default)]
    pub trans_fat: Option<NutrientValue>,
    #[serde(default)]
    pub cholesterol: Option<NutrientValue>,
    #[serde(default)]
    pub sodium: Option<NutrientValue>,
    #[serde(default)]
    pub total_carbohydrate: Option<NutrientValue>,
    #[serde(default)]
    pub dietary_fiber: Option<NutrientValue>,
    #[serde(default)]
    pub total_sugars: Option<NutrientValue>,
    #[serde(default)]
    pub protein: Option<NutrientValue>,
}

/// 营养素数值
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NutrientValue {
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub daily_value: Option<String>,
}

/// 附加信息
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AdditionalInfo {
    #[serde(default)]
    pub manufactured_by: Option<String>,
    #[serde(default)]
    pub facilities: Vec<FacilityInfo>,
    #[serde(default)]
    pub storage: Option<String>,
    #[serde(default)]
    pub cautions: Vec<String>,
}

/// 生产设施信息
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FacilityInfo {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// 各阶段耗时（秒）
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProcessingTime {
    #[serde(default)]
    pub ocr_time: f64,
    #[serde(default)]
    pub structure_time: f64,
    #[serde(default)]
    pub translate_time: f64,
    #[serde(default)]
    pub html_time: f64,
    #[serde(default)]
    pub total_time: f64,
}

/// 完整流水线结果
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PipelineResult {
    #[serde(default)]
    pub ocr_result: OcrResult,
    #[serde(default)]
    pub structured_data: StructureResult,
    #[serde(default)]
    pub translated_data: TranslatedData,
    #[serde(default)]
    pub html_output: String,
    #[serde(default)]
    pub processing_time: ProcessingTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes() -> Vec<u8> {
        let mut b = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        b.extend_from_slice(&[0u8; 16]);
        b
    }

    #[test]
    fn test_request_normalizes_country() {
        let req = ProcessingRequest::new(ImageFile::new("a.png", png_bytes()), "usa", true);
        assert_eq!(req.target_country, "USA");

        let req = ProcessingRequest::new(ImageFile::new("a.png", png_bytes()), " kor ", false);
        assert_eq!(req.target_country, "KOR");
    }

    #[test]
    fn test_image_sniffing() {
        assert!(ImageFile::new("a.png", png_bytes()).is_supported_image());

        let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE0];
        jpeg.extend_from_slice(&[0u8; 16]);
        assert!(ImageFile::new("a.jpg", jpeg).is_supported_image());

        let mut webp = b"RIFF".to_vec();
        webp.extend_from_slice(&[0u8; 4]);
        webp.extend_from_slice(b"WEBP");
        webp.extend_from_slice(&[0u8; 8]);
        assert!(ImageFile::new("a.webp", webp).is_supported_image());

        assert!(!ImageFile::new("a.txt", b"hello world!".to_vec()).is_supported_image());
        assert!(!ImageFile::new("empty", Vec::new()).is_supported_image());
    }

    #[test]
    fn test_pipeline_result_parses_partial_json() {
        // 远程引擎可能省略字段，解析必须容忍
        let json = r#"{
            "html_output": "<html></html>",
            "processing_time": {"ocr_time": 1.2, "total_time": 5.0},
            "translated_data": {
                "source_language": "ko",
                "target_country": "USA",
                "translated_data": {
                    "product": {"type": "Carbonated Soft Drink", "ingredients": ["water"]}
                }
            }
        }"#;
        let result: PipelineResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.html_output, "<html></html>");
        assert_eq!(result.processing_time.ocr_time, 1.2);
        assert_eq!(
            result.translated_data.translated_data.product.product_type,
            Some("Carbonated Soft Drink".to_string())
        );
        assert!(result.ocr_result.texts.is_empty());
    }
}
