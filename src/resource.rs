use crate::import::ImportCommand;

/// A resource Terraform plans to create that is already live in the cloud.
#[derive(Debug, Clone, PartialEq)]
pub struct ExistingResource {
    pub address: String,
    pub resource_type: String,
    /// Human label for messages, e.g. "Log group".
    pub kind_label: String,
    /// The value of the identifying attribute in the plan.
    pub name: String,
    /// What `terraform import` expects for this resource type.
    pub import_id: String,
}

/// Result of an existence check for one planned creation.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(ExistingResource),
    NotFound,
    /// The identifying attribute is only known after apply.
    Unknown { attribute: String },
}

impl ExistingResource {
    pub fn import_command(&self) -> ImportCommand {
        ImportCommand::new(&self.address, &self.import_id)
    }
}
