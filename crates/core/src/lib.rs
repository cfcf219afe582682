//! Core types shared by the amadeus gateways and the change-propagation
//! pipeline.
//!
//! Nothing in this crate performs I/O. The repository and model gateways
//! produce these types, the pipeline sequences them, and the front end
//! consumes them through [`Observer`].

pub use {
    edit::{EditAction, EditSet, FileEdit},
    error::{Error, ErrorKind, Result},
    event::{Progress, Step, StreamEvent},
    message::{Role, Turn},
    observer::Observer,
    repo::{
        BranchState, ChangeRequestRef, CommitRef, Continuation, EntryKind, FileContent,
        MergeStrategy, RepositoryMetadata, RepositoryRef, TreeEntry,
    },
    result::{FailedEdit, Generation, PipelineResult},
    user::{Credentials, User},
};

mod edit;
mod error;
mod event;
mod message;
mod observer;
mod repo;
mod result;
mod user;
