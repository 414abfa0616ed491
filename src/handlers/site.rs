use actix_web::{http::header::ContentType, web, HttpResponse, Responder};

use crate::config::SiteConfig;

/// Crawl rules; `Host` and `Sitemap` only appear once the public URL is known
pub fn robots_txt(site_url: Option<&str>) -> String {
    let mut lines = vec!["User-agent: *".to_string(), "Allow: /".to_string()];

    if let Some(base) = site_url
        .map(|url| url.trim().trim_end_matches('/'))
        .filter(|url| !url.is_empty())
    {
        lines.push(format!("Host: {}", base));
        lines.push(format!("Sitemap: {}/sitemap.xml", base));
    }

    lines.join("\n") + "\n"
}

pub async fn robots_handler(site: web::Data<SiteConfig>) -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(robots_txt(site.url.as_deref()))
}
