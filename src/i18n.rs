// ==========================================
// Módulo de internacionalización (i18n)
// ==========================================
// Usa la librería rust-i18n
// Castellano (por defecto) e inglés
// ==========================================
// Nota: la macro rust_i18n::i18n! ya está inicializada en lib.rs
// ==========================================

/// Idioma actual
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// Cambia el idioma
///
/// # Parámetros
/// - locale: código de idioma ("es" o "en")
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// Traduce un mensaje (sin parámetros)
///
/// # Ejemplo
/// ```no_run
/// use milsim_orbat::i18n::t;
/// let msg = t("common.success");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// Traduce un mensaje (con parámetros)
///
/// # Ejemplo
/// ```no_run
/// use milsim_orbat::i18n::t_with_args;
/// let msg = t_with_args("transfer.member_not_found", &[("id", "42")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}
