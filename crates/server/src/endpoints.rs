//! The Mailgun endpoints exposed as tools.
//!
//! Hand-maintained and ordered; fixed at build time. Every entry must name an
//! operation in the shipped API description. Entries that do not match are skipped
//! with a warning at startup, so editing this list never breaks the rest of the
//! tool set.

/// `"VERB /url/{template}"` pairs eligible to become tools.
pub const ENDPOINTS: &[&str] = &[
    // Messages
    "POST /v3/{domain_name}/messages",
    "POST /v3/{domain_name}/messages.mime",
    "GET /v3/domains/{domain_name}/messages/{storage_key}",
    // Domains
    "GET /v4/domains",
    "GET /v4/domains/{name}",
    "POST /v4/domains",
    "PUT /v4/domains/{name}/verify",
    "DELETE /v3/domains/{name}",
    "GET /v3/domains/{name}/connection",
    "PUT /v3/domains/{name}/connection",
    "GET /v3/domains/{name}/tracking",
    // Events
    "GET /v3/{domain_name}/events",
    // Stats
    "GET /v3/{domain_name}/stats/total",
    "GET /v3/stats/total",
    // Tags
    "GET /v3/{domain_name}/tags",
    "GET /v3/{domain_name}/tags/{tag}",
    "PUT /v3/{domain_name}/tags/{tag}",
    "DELETE /v3/{domain_name}/tags/{tag}",
    "GET /v3/{domain_name}/tags/{tag}/stats",
    // Suppressions: bounces
    "GET /v3/{domain_name}/bounces",
    "GET /v3/{domain_name}/bounces/{address}",
    "POST /v3/{domain_name}/bounces",
    "DELETE /v3/{domain_name}/bounces/{address}",
    "DELETE /v3/{domain_name}/bounces",
    // Suppressions: complaints
    "GET /v3/{domain_name}/complaints",
    "GET /v3/{domain_name}/complaints/{address}",
    "POST /v3/{domain_name}/complaints",
    "DELETE /v3/{domain_name}/complaints/{address}",
    // Suppressions: unsubscribes
    "GET /v3/{domain_name}/unsubscribes",
    "GET /v3/{domain_name}/unsubscribes/{address}",
    "POST /v3/{domain_name}/unsubscribes",
    "DELETE /v3/{domain_name}/unsubscribes/{address}",
    // Suppressions: whitelists
    "GET /v3/{domain_name}/whitelists",
    "GET /v3/{domain_name}/whitelists/{value}",
    "POST /v3/{domain_name}/whitelists",
    "DELETE /v3/{domain_name}/whitelists/{value}",
    // Routes
    "GET /v3/routes",
    "GET /v3/routes/{route_id}",
    "POST /v3/routes",
    "PUT /v3/routes/{route_id}",
    "DELETE /v3/routes/{route_id}",
    // Mailing lists
    "GET /v3/lists/pages",
    "GET /v3/lists/{address}",
    "POST /v3/lists",
    "PUT /v3/lists/{address}",
    "DELETE /v3/lists/{address}",
    "GET /v3/lists/{address}/members/pages",
    "GET /v3/lists/{address}/members/{member_address}",
    "POST /v3/lists/{address}/members",
    "PUT /v3/lists/{address}/members/{member_address}",
    "DELETE /v3/lists/{address}/members/{member_address}",
    // Templates
    "GET /v3/{domain_name}/templates",
    "GET /v3/{domain_name}/templates/{template_name}",
    "POST /v3/{domain_name}/templates",
    "DELETE /v3/{domain_name}/templates/{template_name}",
    // Webhooks
    "GET /v3/domains/{domain_name}/webhooks",
    "GET /v3/domains/{domain_name}/webhooks/{webhook_name}",
    "POST /v3/domains/{domain_name}/webhooks",
    "PUT /v3/domains/{domain_name}/webhooks/{webhook_name}",
    "DELETE /v3/domains/{domain_name}/webhooks/{webhook_name}",
    // Dedicated IPs
    "GET /v3/ips",
    "GET /v3/ips/{ip}",
];
