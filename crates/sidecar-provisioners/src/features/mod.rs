pub mod directory_provisioner;
