//! Solidity ABI bindings for the Silo deployer, factory and version lens.

use alloy::sol;

sol! {
    #[sol(all_derives = true)]
    interface ISiloDeployer {
        event SiloCreated(address siloConfig);
    }
}

sol! {
    #[sol(all_derives = true, rpc)]
    interface ISiloFactory {
        event NewSilo(
            address indexed implementation,
            address indexed token0,
            address indexed token1,
            address silo0,
            address silo1,
            address siloConfig
        );

        event NewSiloShareTokens(
            address protectedShareToken,
            address collateralShareToken,
            address debtShareToken
        );

        event NewSiloHook(address indexed silo, address indexed hook);

        function isSilo(address silo) external view returns (bool);
    }
}

sol! {
    #[sol(all_derives = true, rpc)]
    interface ISiloVersions {
        function getVersion(address implementation) external view returns (string memory version);

        function getVersions(address[] calldata implementations)
            external
            view
            returns (string[] memory versions);
    }
}
