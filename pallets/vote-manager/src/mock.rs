use crate as pallet_vote_manager;
use frame_support::{
	derive_impl,
	traits::{ConstU16, ConstU32, ConstU64, Everything},
};
use permissioning_primitives::ImplementationResolver;
use sp_core::H256;
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
		VoteManager: pallet_vote_manager,
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

/// Stands in for the permissions pallet: the implementation is always
/// [`implementation`].
pub struct FixedImplementation;

impl ImplementationResolver<Test> for FixedImplementation {
	fn permission_impl() -> Option<AccountId> {
		Some(implementation())
	}
}

impl pallet_vote_manager::Config for Test {
	type RuntimeEvent = RuntimeEvent;
	type Upgradable = FixedImplementation;
}

pub fn account(seed: u8) -> AccountId {
	let mut account_bytes = [0u8; 32];
	account_bytes[31] = seed;
	AccountId32::from(account_bytes)
}

pub fn implementation() -> AccountId {
	account(100)
}

// Build genesis storage according to the mock runtime.
pub fn new_test_ext() -> sp_io::TestExternalities {
	let t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();

	let mut ext = sp_io::TestExternalities::new(t);
	ext.execute_with(|| {
		System::set_block_number(1);
	});
	ext
}
