//! 目标国家对照表
//!
//! 仅用于日志显示和输出文件命名；不在对照表中的代码仍然原样下发，
//! 是否支持由远程引擎决定。

use phf::phf_map;

static COUNTRY_NAMES: phf::Map<&'static str, &'static str> = phf_map! {
    "USA" => "美国",
    "KOR" => "韩国",
    "JPN" => "日本",
    "CHN" => "中国",
    "TWN" => "台湾地区",
    "VNM" => "越南",
    "THA" => "泰国",
    "SGP" => "新加坡",
    "EU" => "欧盟",
    "GBR" => "英国",
    "CAN" => "加拿大",
    "AUS" => "澳大利亚",
};

/// 查询国家代码对应的显示名称
pub fn country_name(code: &str) -> Option<&'static str> {
    COUNTRY_NAMES.get(code).copied()
}

/// 用于日志的"名称 (代码)"展示
pub fn country_label(code: &str) -> String {
    match country_name(code) {
        Some(name) => format!("{} ({})", name, code),
        None => code.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_country() {
        assert_eq!(country_name("USA"), Some("美国"));
        assert_eq!(country_label("KOR"), "韩国 (KOR)");
    }

    #[test]
    fn test_unknown_country_passes_through() {
        assert_eq!(country_name("ZZZ"), None);
        assert_eq!(country_label("ZZZ"), "ZZZ");
    }
}
