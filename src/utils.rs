//! Naming helpers shared by the schema front end and the drivers.

/// Converts `PascalCase`/`camelCase` to `snake_case`.
///
/// An underscore is inserted before every uppercase character except the first,
/// so `UserProfile` becomes `user_profile` and `HTTPLog` becomes `h_t_t_p_log`.
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && c.is_uppercase() {
            result.push('_');
        }
        result.extend(c.to_lowercase());
    }
    result
}

/// Converts `snake_case` to `PascalCase`.
pub fn to_pascal_case(s: &str) -> String {
    s.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Converts `snake_case` to `camelCase`.
pub fn to_camel_case(s: &str) -> String {
    let pascal = to_pascal_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => pascal,
    }
}

/// English pluralisation used for table names.
///
/// - trailing `y` → `ies`
/// - trailing `s`, `x`, `z`, `ch`, `sh` → `+es`
/// - otherwise `+s`
pub fn pluralize(s: &str) -> String {
    if let Some(stem) = s.strip_suffix('y') {
        return format!("{}ies", stem);
    }
    let sibilant = ["s", "x", "z", "ch", "sh"];
    if sibilant.iter().any(|suffix| s.ends_with(suffix)) {
        return format!("{}es", s);
    }
    format!("{}s", s)
}

/// Derives a table name from a model name: snake_case, then pluralised.
pub fn table_name(model_name: &str) -> String {
    pluralize(&to_snake_case(model_name))
}
