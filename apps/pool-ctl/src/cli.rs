use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use vim_sdk::proto::types::{
    ResourceAllocationInfo, ResourceConfigSpec, SharesInfo, SharesLevel, VAppConfigSpec,
};

#[derive(Parser, Debug)]
#[command(name = "pool-ctl", about = "Manage a vim resource pool", version)]
pub struct Cli {
    /// Server root, e.g. https://vcenter.example.com (overrides POOL_CTL__URL)
    #[arg(long)]
    pub url: Option<String>,

    /// Existing API session id (overrides POOL_CTL__SESSION_ID)
    #[arg(long)]
    pub session_id: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long)]
    pub insecure: bool,

    /// Inventory path shown alongside the pool reference in output
    #[arg(long)]
    pub path: Option<String>,

    /// Managed object id of the pool, e.g. resgroup-9
    pub pool: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the pool's display name
    Name,
    /// Create a child resource pool
    Create {
        #[arg(long)]
        name: String,
        #[command(flatten)]
        allocation: AllocationArgs,
    },
    /// Create a child vApp
    CreateVapp {
        #[arg(long)]
        name: String,
        /// Folder id for the vApp's VMs, e.g. group-v4
        #[arg(long)]
        folder: Option<String>,
        #[arg(long)]
        annotation: Option<String>,
        #[command(flatten)]
        allocation: AllocationArgs,
    },
    /// Import a packaged application from a JSON import spec
    ImportVapp {
        /// File holding the import spec JSON (`_typeName` tagged)
        #[arg(long)]
        spec: PathBuf,
        #[arg(long)]
        folder: Option<String>,
        #[arg(long)]
        host: Option<String>,
        /// Wait for the lease to become ready and print its device URLs
        #[arg(long)]
        wait: bool,
    },
    /// Rename and/or change allocations
    UpdateConfig {
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        allocation: AllocationArgs,
    },
    /// Destroy every child pool and vApp
    DestroyChildren,
    /// Destroy the pool
    Destroy {
        /// Wait for the destroy task to finish
        #[arg(long)]
        wait: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SharesArg {
    Low,
    Normal,
    High,
}

impl From<SharesArg> for SharesLevel {
    fn from(value: SharesArg) -> Self {
        match value {
            SharesArg::Low => SharesLevel::Low,
            SharesArg::Normal => SharesLevel::Normal,
            SharesArg::High => SharesLevel::High,
        }
    }
}

#[derive(Args, Debug, Default, Clone)]
pub struct AllocationArgs {
    /// CPU reservation in MHz
    #[arg(long)]
    pub cpu_reservation: Option<i64>,
    /// CPU limit in MHz (-1 for unlimited)
    #[arg(long, allow_hyphen_values = true)]
    pub cpu_limit: Option<i64>,
    #[arg(long)]
    pub cpu_expandable: Option<bool>,
    #[arg(long, value_enum)]
    pub cpu_shares: Option<SharesArg>,
    /// Memory reservation in MB
    #[arg(long)]
    pub memory_reservation: Option<i64>,
    /// Memory limit in MB (-1 for unlimited)
    #[arg(long, allow_hyphen_values = true)]
    pub memory_limit: Option<i64>,
    #[arg(long)]
    pub memory_expandable: Option<bool>,
    #[arg(long, value_enum)]
    pub memory_shares: Option<SharesArg>,
}

impl AllocationArgs {
    pub fn is_empty(&self) -> bool {
        self.cpu_reservation.is_none()
            && self.cpu_limit.is_none()
            && self.cpu_expandable.is_none()
            && self.cpu_shares.is_none()
            && self.memory_reservation.is_none()
            && self.memory_limit.is_none()
            && self.memory_expandable.is_none()
            && self.memory_shares.is_none()
    }

    /// Overlays the flags that were given onto `base`.
    pub fn apply(&self, mut base: ResourceConfigSpec) -> ResourceConfigSpec {
        overlay(
            &mut base.cpu_allocation,
            self.cpu_reservation,
            self.cpu_limit,
            self.cpu_expandable,
            self.cpu_shares,
        );
        overlay(
            &mut base.memory_allocation,
            self.memory_reservation,
            self.memory_limit,
            self.memory_expandable,
            self.memory_shares,
        );
        base
    }

    /// Spec for a new pool: server defaults plus any flags.
    pub fn create_spec(&self) -> ResourceConfigSpec {
        self.apply(ResourceConfigSpec::expandable())
    }

    /// Spec for an update: only the changed allocations, or nothing at all.
    pub fn update_spec(&self) -> Option<ResourceConfigSpec> {
        if self.is_empty() {
            None
        } else {
            Some(self.apply(ResourceConfigSpec::default()))
        }
    }
}

fn overlay(
    allocation: &mut ResourceAllocationInfo,
    reservation: Option<i64>,
    limit: Option<i64>,
    expandable: Option<bool>,
    shares: Option<SharesArg>,
) {
    if reservation.is_some() {
        allocation.reservation = reservation;
    }
    if limit.is_some() {
        allocation.limit = limit;
    }
    if expandable.is_some() {
        allocation.expandable_reservation = expandable;
    }
    if let Some(level) = shares {
        allocation.shares = Some(SharesInfo::level(level.into()));
    }
}

pub fn vapp_config(annotation: Option<String>) -> VAppConfigSpec {
    VAppConfigSpec {
        annotation,
        ..Default::default()
    }
}
