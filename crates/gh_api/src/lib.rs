pub mod client;
pub mod dates;
pub mod decode;
pub mod models;

pub use client::{build_url, FetchError, HttpRemoteClient, RemoteClient};
pub use decode::{decode_array, decode_object, DecodeError};
pub use models::{Commit, CommitRef, Repository, User};
