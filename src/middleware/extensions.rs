use crate::core::manager::RequestPolicy;
use crate::error::CspError;
use actix_web::HttpMessage;

/// Access to the request's policy from handlers and renderers.
pub trait CspExtensions {
    /// The policy of this request, if the CSP middleware is installed.
    fn csp_policy(&self) -> Option<RequestPolicy>;

    /// The request nonce, generated on first use.
    fn csp_nonce(&self) -> Option<Result<String, CspError>> {
        self.csp_policy().map(|policy| {
            let mut manager = policy.lock();
            manager.get_nonce()
        })
    }
}

impl<T> CspExtensions for T
where
    T: HttpMessage,
{
    fn csp_policy(&self) -> Option<RequestPolicy> {
        self.extensions().get::<RequestPolicy>().cloned()
    }
}
