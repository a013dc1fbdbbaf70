use crate::workflows::planning::domain::FunctionalCategory;

/// Map a spreadsheet category cell to a functional category. Matching ignores
/// case and accents so the Spanish and English column values both work.
pub(crate) fn category_for_token(value: &str) -> Option<FunctionalCategory> {
    match normalize_token(value).as_str() {
        "docencia" | "teaching" => Some(FunctionalCategory::Teaching),
        "investigacion" | "research" => Some(FunctionalCategory::Research),
        "vinculacion" | "outreach" => Some(FunctionalCategory::Outreach),
        "gestion" | "management" => Some(FunctionalCategory::Management),
        _ => None,
    }
}

fn normalize_token(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|c| !matches!(c, '\u{feff}' | '\u{200b}'))
        .map(|c| match c {
            'á' | 'Á' => 'a',
            'é' | 'É' => 'e',
            'í' | 'Í' => 'i',
            'ó' | 'Ó' => 'o',
            'ú' | 'Ú' => 'u',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}
