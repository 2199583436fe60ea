//! services/template_renderer.rs
//! Sustitución de `{{placeholder}}`, reescritura de enlaces hacia el endpoint
//! de click-tracking y pixel invisible de apertura.

use std::collections::HashMap;

use crate::models::{email_model::RenderedEmail, template_model::EmailTemplate};

const OPEN_TRACKING_PATH: &str = "/api/phishing/open";
const CLICK_TRACKING_PATH: &str = "/api/phishing/click";

/// Renderiza asunto y cuerpo de una plantilla para un identificador de tracking.
///
/// - El asunto sólo recibe la sustitución de placeholders.
/// - En el cuerpo, cada aparición de un valor con forma de enlace
///   (`http://` / `https://`) se reescribe hacia el redirect de click-tracking.
/// - Al final del cuerpo se agrega exactamente un pixel de apertura.
pub fn render(
    template: &EmailTemplate,
    placeholders: &HashMap<String, String>,
    tracking_id: &str,
    tracking_base_url: &str,
) -> RenderedEmail {
    let subject = substitute_placeholders(&template.subject, placeholders);
    let body = substitute_placeholders(&template.body, placeholders);

    let links: Vec<&str> = placeholders
        .values()
        .map(String::as_str)
        .filter(|v| is_link_like(v))
        .collect();

    let mut body = rewrite_links(&body, &links, tracking_id, tracking_base_url);
    body.push_str(&open_tracking_pixel(tracking_id, tracking_base_url));

    RenderedEmail { subject, body }
}

/// Reemplaza cada `{{key}}` presente en el mapa por su valor, en una sola pasada.
/// Los valores insertados no se vuelven a examinar y las claves desconocidas
/// quedan tal cual.
pub fn substitute_placeholders(template: &str, placeholders: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        let value = after_open
            .find("}}")
            .and_then(|end| placeholders.get(&after_open[..end]).map(|v| (end, v)));

        match value {
            Some((end, v)) => {
                out.push_str(v);
                rest = &after_open[end + 2..];
            }
            None => {
                // Avanzamos un solo '{' para no perder un "{{key}}" que empiece justo después
                out.push('{');
                rest = &rest[start + 1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Sin recortar espacios: el valor se reescribe tal como aparece en el cuerpo
pub fn is_link_like(value: &str) -> bool {
    let lowered = value.to_ascii_lowercase();
    lowered.starts_with("http://") || lowered.starts_with("https://")
}

pub fn click_tracking_url(tracking_base_url: &str, tracking_id: &str, target: &str) -> String {
    format!(
        "{}{}?emailId={}&target={}",
        tracking_base_url.trim_end_matches('/'),
        CLICK_TRACKING_PATH,
        urlencoding::encode(tracking_id),
        urlencoding::encode(target)
    )
}

pub fn open_tracking_url(tracking_base_url: &str, tracking_id: &str) -> String {
    format!(
        "{}{}?emailId={}",
        tracking_base_url.trim_end_matches('/'),
        OPEN_TRACKING_PATH,
        urlencoding::encode(tracking_id)
    )
}

fn open_tracking_pixel(tracking_id: &str, tracking_base_url: &str) -> String {
    format!(
        "<img src=\"{}\" width=\"1\" height=\"1\" style=\"display:none;\" alt=\"\" />",
        open_tracking_url(tracking_base_url, tracking_id)
    )
}

/// Reescribe cada aparición de cada enlace. En cada posición gana el enlace más
/// largo, así un enlace que es prefijo de otro no rompe al segundo.
fn rewrite_links(body: &str, links: &[&str], tracking_id: &str, tracking_base_url: &str) -> String {
    let mut links: Vec<&str> = links.iter().copied().filter(|l| !l.is_empty()).collect();
    if links.is_empty() {
        return body.to_string();
    }
    links.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    links.dedup();

    let mut out = String::with_capacity(body.len());
    let mut i = 0;
    while i < body.len() {
        let tail = &body[i..];
        match links.iter().find(|l| tail.starts_with(**l)) {
            Some(link) => {
                out.push_str(&click_tracking_url(tracking_base_url, tracking_id, link));
                i += link.len();
            }
            None => {
                let ch = tail.chars().next().unwrap_or_default();
                out.push(ch);
                i += ch.len_utf8();
            }
        }
    }
    out
}
