//! Authorization for the admin surface
//!
//! Provides context-based authorization:
//! - Administrators (may export and delete)
//! - Plain authenticated users
//! - Anonymous callers

use crate::config::PrincipalConfig;
use anyhow::Result;
use async_trait::async_trait;
use axum::http::{HeaderMap, header};
use std::collections::HashMap;

/// Authorization context extracted from a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthContext {
    /// Site administrator
    Admin { admin_id: u64 },

    /// Authenticated account without admin capability
    User { user_id: u64, roles: Vec<String> },

    /// No authentication
    Anonymous,
}

impl AuthContext {
    /// Check if context represents an admin
    pub fn is_admin(&self) -> bool {
        matches!(self, AuthContext::Admin { .. })
    }

    /// Id of the acting principal, used to protect it from deletion
    pub fn principal_id(&self) -> Option<u64> {
        match self {
            AuthContext::Admin { admin_id } => Some(*admin_id),
            AuthContext::User { user_id, .. } => Some(*user_id),
            AuthContext::Anonymous => None,
        }
    }
}

/// Authorization policy for an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthPolicy {
    /// Any authenticated principal
    Authenticated,

    /// Principal must hold one of these roles
    HasRole(Vec<String>),

    /// Admin only
    AdminOnly,

    /// Combination of policies (OR)
    Or(Vec<AuthPolicy>),
}

impl AuthPolicy {
    /// Check if auth context satisfies this policy
    pub fn check(&self, context: &AuthContext) -> bool {
        match self {
            AuthPolicy::Authenticated => !matches!(context, AuthContext::Anonymous),

            AuthPolicy::HasRole(required) => match context {
                AuthContext::User { roles, .. } => required.iter().any(|r| roles.contains(r)),
                _ => false,
            },

            AuthPolicy::AdminOnly => context.is_admin(),

            AuthPolicy::Or(policies) => policies.iter().any(|p| p.check(context)),
        }
    }

    /// Parse policy from string (for YAML config)
    pub fn parse_policy(s: &str) -> Self {
        match s {
            "authenticated" => AuthPolicy::Authenticated,
            "admin_only" => AuthPolicy::AdminOnly,
            s if s.starts_with("admin_or_role:") => {
                let role = s.trim_start_matches("admin_or_role:").to_string();
                AuthPolicy::Or(vec![AuthPolicy::AdminOnly, AuthPolicy::HasRole(vec![role])])
            }
            s if s.starts_with("role:") => {
                AuthPolicy::HasRole(vec![s.trim_start_matches("role:").to_string()])
            }
            _ => AuthPolicy::AdminOnly, // Default
        }
    }
}

/// Trait for auth providers
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Extract auth context from request headers
    async fn extract_context(&self, headers: &HeaderMap) -> Result<AuthContext>;
}

/// Bearer-token provider backed by the configured principal list
pub struct TokenAuthProvider {
    principals: HashMap<String, AuthContext>,
}

impl TokenAuthProvider {
    pub fn new(principals: &[PrincipalConfig]) -> Self {
        let principals = principals
            .iter()
            .map(|p| {
                let context = if p.admin {
                    AuthContext::Admin { admin_id: p.id }
                } else {
                    AuthContext::User {
                        user_id: p.id,
                        roles: p.roles.clone(),
                    }
                };
                (p.token.clone(), context)
            })
            .collect();
        Self { principals }
    }
}

#[async_trait]
impl AuthProvider for TokenAuthProvider {
    async fn extract_context(&self, headers: &HeaderMap) -> Result<AuthContext> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim);

        Ok(token
            .and_then(|t| self.principals.get(t).cloned())
            .unwrap_or(AuthContext::Anonymous))
    }
}
