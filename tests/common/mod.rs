//! Shared fixtures for the integration tests

#![allow(dead_code)]

use insightdeck::deck::Package;
use insightdeck::starter_template;

/// Four respondents, balanced across every category.
pub const SURVEY_CSV: &str = "\
Gender,Preference,Region
M,A,North
F,B,South
M,B,North
F,A,South
";

/// Same respondents without the Region column.
pub const SURVEY_WITHOUT_REGION: &str = "\
Gender,Preference
M,A
F,B
M,B
F,A
";

pub const GENDER_LABEL: &str = "Gender vs Preference";
pub const REGION_LABEL: &str = "Region vs Preference";

pub fn template() -> Vec<u8> {
    starter_template().expect("starter template builds")
}

/// Starter template whose master only lists the title layout.
pub fn template_without_content_layout() -> Vec<u8> {
    let mut package = Package::from_bytes(&template()).unwrap();
    let master = package
        .xml("ppt/slideMasters/slideMaster1.xml")
        .unwrap()
        .replace(r#"<p:sldLayoutId id="2147483650" r:id="rId2"/>"#, "");
    package.set_part("ppt/slideMasters/slideMaster1.xml", master.into_bytes());
    package.to_bytes().unwrap()
}

pub fn mock_bullets(label: &str) -> Vec<String> {
    (1..=3).map(|n| format!("{} – point {} (mock)", label, n)).collect()
}
