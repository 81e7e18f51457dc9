use crate::config::Secret;
use crate::model::verify::CandidateToken;

pub struct AuthService;

impl AuthService {
    /// An absent or opaque candidate never matches, whatever the secret is.
    pub fn is_valid_token(secret: &Secret, candidate: Option<&CandidateToken>) -> bool {
        match candidate {
            Some(CandidateToken::Text(token)) => secret.matches(token),
            Some(CandidateToken::Opaque) | None => false,
        }
    }
}
