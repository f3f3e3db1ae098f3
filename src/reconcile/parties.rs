// ABOUTME: Authorized-party reconciliation shared by create and update.
// ABOUTME: Overwrites with the desired set, or clears only when something is granted.

use snafu::ResultExt;

use crate::api::{AuthorizationOps, AuthorizedParty, FunctionAuthorization};
use crate::types::{FunctionId, VersionId};

use super::error::{AuthorizeSnafu, ListAuthorizationSnafu, ResourceError, UnauthorizeSnafu};

/// Make the version's invokers match `desired`.
///
/// A non-empty set overwrites the remote list in one call. An empty set
/// queries first and clears only if the remote list is non-empty; the
/// returned authorization is then empty.
pub async fn reconcile_parties<A>(
    api: &A,
    function: &FunctionId,
    version: &VersionId,
    desired: &[AuthorizedParty],
) -> Result<FunctionAuthorization, ResourceError>
where
    A: AuthorizationOps + ?Sized,
{
    if !desired.is_empty() {
        return api
            .authorize_parties(function, version, desired)
            .await
            .context(AuthorizeSnafu);
    }

    let current = api
        .get_authorization(function, version)
        .await
        .context(ListAuthorizationSnafu)?;

    if !current.authorized_parties.is_empty() {
        tracing::info!(
            function_id = %function,
            version_id = %version,
            parties = current.authorized_parties.len(),
            "removing authorized parties"
        );
        api.unauthorize_all_parties(function, version)
            .await
            .context(UnauthorizeSnafu)?;
    }

    Ok(FunctionAuthorization::default())
}
