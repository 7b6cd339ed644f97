use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("tlvprims {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: tlvprims");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "build_target: {}",
        option_env!("TLVPRIMS_BUILD_TARGET").unwrap_or("unknown")
    );
    println!(
        "features: compress={}, crypto={}, cli=true",
        cfg!(feature = "compress"),
        cfg!(feature = "crypto")
    );

    Ok(SUCCESS)
}
