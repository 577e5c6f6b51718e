use crate as pallet_permissions;
use frame_support::{
	derive_impl, parameter_types,
	traits::{ConstU16, ConstU32, ConstU64, Everything},
	PalletId,
};
use sp_core::H256;
use sp_keyring::AccountKeyring;
use sp_runtime::{
	traits::{BlakeTwo256, IdentifyAccount, IdentityLookup},
	AccountId32, BuildStorage, MultiSigner,
};

type Block = frame_system::mocking::MockBlock<Test>;
pub type AccountId = <MultiSigner as IdentifyAccount>::AccountId;

// Configure a mock runtime to test the pallet.
frame_support::construct_runtime!(
	pub enum Test {
		System: frame_system,
		OrgManager: pallet_org_manager,
		AccountManager: pallet_account_manager,
		NodeManager: pallet_node_manager,
		VoteManager: pallet_vote_manager,
		Permissions: pallet_permissions,
	}
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
	type BaseCallFilter = Everything;
	type BlockWeights = ();
	type BlockLength = ();
	type DbWeight = ();
	type RuntimeOrigin = RuntimeOrigin;
	type RuntimeCall = RuntimeCall;
	type Block = Block;
	type Hash = H256;
	type Hashing = BlakeTwo256;
	type AccountId = AccountId;
	type Lookup = IdentityLookup<Self::AccountId>;
	type RuntimeEvent = RuntimeEvent;
	type BlockHashCount = ConstU64<250>;
	type Version = ();
	type PalletInfo = PalletInfo;
	type AccountData = ();
	type OnNewAccount = ();
	type OnKilledAccount = ();
	type SystemWeightInfo = ();
	type SS58Prefix = ConstU16<42>;
	type OnSetCode = ();
	type MaxConsumers = ConstU32<16>;
	type Nonce = u64;
}

impl pallet_org_manager::Config for Test {
	type RuntimeEvent = RuntimeEvent;
	type Upgradable = Permissions;
}

impl pallet_account_manager::Config for Test {
	type RuntimeEvent = RuntimeEvent;
	type Upgradable = Permissions;
}

impl pallet_node_manager::Config for Test {
	type RuntimeEvent = RuntimeEvent;
	type Upgradable = Permissions;
}

impl pallet_vote_manager::Config for Test {
	type RuntimeEvent = RuntimeEvent;
	type Upgradable = Permissions;
}

parameter_types! {
	pub const PermissionsPalletId: PalletId = PalletId(*b"permupgr");
}

impl pallet_permissions::Config for Test {
	type RuntimeEvent = RuntimeEvent;
	type PalletId = PermissionsPalletId;
	type OrgManager = OrgManager;
	type AccountManager = AccountManager;
	type NodeManager = NodeManager;
	type VoteManager = VoteManager;
}

pub const ADMIN_ORG: &[u8] = b"ADMIN";

pub fn alice() -> AccountId {
	AccountKeyring::Alice.to_account_id()
}
pub fn bob() -> AccountId {
	AccountKeyring::Bob.to_account_id()
}
pub fn charlie() -> AccountId {
	AccountKeyring::Charlie.to_account_id()
}
pub fn dave() -> AccountId {
	AccountKeyring::Dave.to_account_id()
}
pub fn eve() -> AccountId {
	AccountKeyring::Eve.to_account_id()
}
pub fn guardian() -> AccountId {
	AccountKeyring::Ferdie.to_account_id()
}

pub fn interface_account() -> AccountId {
	AccountId32::from([0xa1; 32])
}
pub fn impl_v1() -> AccountId {
	AccountId32::from([0xb1; 32])
}
pub fn impl_v2() -> AccountId {
	AccountId32::from([0xb2; 32])
}

fn ext_with(config: pallet_permissions::GenesisConfig<Test>) -> sp_io::TestExternalities {
	let mut t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();
	config.assimilate_storage(&mut t).unwrap();

	let mut ext = sp_io::TestExternalities::new(t);
	ext.execute_with(|| {
		System::set_block_number(1);
	});
	ext
}

/// Only the guardian is known; nothing is bound yet.
pub fn new_test_ext() -> sp_io::TestExternalities {
	ext_with(pallet_permissions::GenesisConfig { guardian: Some(guardian()), ..Default::default() })
}

/// A booted network: alliance org `ADMIN`, with alice, bob and charlie as
/// its admins and voters, and one alliance node.
pub fn booted_ext() -> sp_io::TestExternalities {
	ext_with(pallet_permissions::GenesisConfig {
		guardian: Some(guardian()),
		perm_interface: Some(interface_account()),
		perm_impl: Some(impl_v1()),
		alliance_admin_org: ADMIN_ORG.to_vec(),
		alliance_accounts: vec![alice(), bob(), charlie()],
		alliance_nodes: vec![(b"enode-admin".to_vec(), 3, b"vrf0".to_vec(), b"bls0".to_vec(), 10)],
		network_boot: true,
	})
}
