pub mod folder;

pub use folder::{
    Folder, FolderClass, FolderDetails, FolderType, MoreMessages, ParseFolderValueError,
};
