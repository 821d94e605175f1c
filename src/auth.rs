// Login/logout against the session store.
// The identity provider is opaque: given some user interaction it hands back an
// access token or fails. The token is never decoded or validated here.

use std::io::BufRead;

use crate::error::AuthError;
use crate::session::TokenStore;

pub trait IdentityProvider {
    fn obtain_token(&mut self) -> Result<String, AuthError>;
}

// Token supplied up front (command-line flag, env, embedding app)
pub struct StaticToken(pub String);

impl IdentityProvider for StaticToken {
    fn obtain_token(&mut self) -> Result<String, AuthError> {
        let token = self.0.trim();
        if token.is_empty() {
            return Err(AuthError::NoToken);
        }
        Ok(token.to_string())
    }
}

/// Reads an access token pasted by the user after completing the provider's
/// sign-in page (first non-empty line).
pub struct PastedToken<R> {
    reader: R,
}

impl<R: BufRead> PastedToken<R> {
    pub fn new(reader: R) -> Self {
        PastedToken { reader }
    }
}

impl<R: BufRead> IdentityProvider for PastedToken<R> {
    fn obtain_token(&mut self) -> Result<String, AuthError> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                return Err(AuthError::NoToken);
            }
            let token = line.trim();
            if !token.is_empty() {
                return Ok(token.to_string());
            }
        }
    }
}

// Obtains a token and stores it; on failure the store is left untouched
pub fn login(store: &dyn TokenStore, provider: &mut dyn IdentityProvider) -> Result<(), AuthError> {
    let token = provider.obtain_token()?;
    store.set(&token)?;
    tracing::info!("Signed in; session token stored ({} chars)", token.len());
    Ok(())
}

pub fn logout(store: &dyn TokenStore) -> Result<(), AuthError> {
    store.clear()?;
    tracing::info!("Signed out");
    Ok(())
}

pub fn is_signed_in(store: &dyn TokenStore) -> bool {
    store.get().is_some()
}
