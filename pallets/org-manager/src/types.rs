use codec::{Decode, Encode};
use permissioning_primitives::{OrgId, OrgStatus};
use scale_info::TypeInfo;
use sp_runtime::RuntimeDebug;

#[derive(Encode, Decode, Clone, Eq, PartialEq, RuntimeDebug, TypeInfo)]
pub struct OrgDetails {
	pub org_id: OrgId,
	pub status: OrgStatus,
}
