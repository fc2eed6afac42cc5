//! Selección múltiple con opción exclusiva ("None of these", "Not sure").
//!
//! Regla: en todo momento vale exactamente una de
//! {"sólo la opción exclusiva seleccionada"} o
//! {"cero o más opciones no exclusivas seleccionadas"}.

/// Alterna `option` dentro de `selected` respetando la opción exclusiva.
///
/// - Elegir la exclusiva limpia el resto (o la deselecciona si ya estaba).
/// - Elegir cualquier otra quita la exclusiva.
pub fn toggle_exclusive(selected: &[String], option: &str, exclusive: Option<&str>) -> Vec<String> {
    let already = selected.iter().any(|s| s == option);
    if exclusive == Some(option) {
        return if already { Vec::new() } else { vec![option.to_string()] };
    }
    let mut next: Vec<String> = selected.iter()
                                        .filter(|s| Some(s.as_str()) != exclusive)
                                        .cloned()
                                        .collect();
    if already {
        next.retain(|s| s != option);
    } else {
        next.push(option.to_string());
    }
    next
}

/// Opciones a mostrar: la exclusiva se oculta mientras haya opciones
/// específicas seleccionadas.
pub fn visible_options<'a>(options: &'a [String], selected: &[String], exclusive: Option<&str>) -> Vec<&'a str> {
    let has_specific = selected.iter().any(|s| Some(s.as_str()) != exclusive);
    options.iter()
           .map(String::as_str)
           .filter(|o| !(has_specific && Some(*o) == exclusive))
           .collect()
}

/// `true` si la selección respeta la regla de la opción exclusiva.
pub fn is_consistent(selected: &[String], exclusive: Option<&str>) -> bool {
    match exclusive {
        Some(ex) if selected.iter().any(|s| s == ex) => selected.len() == 1,
        _ => true,
    }
}
