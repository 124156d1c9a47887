mod args;

pub use args::{Cli, Command, DrillArgs};

use terraport::{DrillOptions, ProviderConfig, SecretsWrapper};

impl DrillArgs {
    pub fn drill_options(&self) -> DrillOptions {
        DrillOptions {
            verbose: self.verbose,
            delete: self.delete,
            announce: self.output,
            wrapper: self.onepassword.then(|| SecretsWrapper::OnePassword {
                env_file: self.env_file.clone(),
            }),
        }
    }

    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            region: Some(self.region.clone()),
            account_id: self.account_id.clone(),
        }
    }
}
