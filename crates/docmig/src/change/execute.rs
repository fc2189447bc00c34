use super::Change;
use crate::command::Command;
use crate::error::ExecuteError;
use crate::value::Fields;

impl Change {
    /// Pushes the resolved change to its store as-is.
    pub fn execute(&self) -> Result<(), ExecuteError> {
        self.execute_with(|fields| fields)
    }

    /// Pushes the resolved change to its store, passing the patch through
    /// `transform` first. Exactly one store call is made; its error is
    /// returned unchanged.
    pub fn execute_with<F>(&self, transform: F) -> Result<(), ExecuteError>
    where
        F: FnOnce(Fields) -> Fields,
    {
        if let Some(err) = &self.error {
            return Err(ExecuteError::Unresolved {
                path: self.doc_path.clone(),
                source: err.clone(),
            });
        }

        tracing::info!(path = %self.doc_path, command = %self.command, "executing change");
        let result = match self.command {
            Command::Update => {
                let data = transform(self.patch.clone().unwrap_or_default());
                self.store.update_doc(&self.doc_path, &data)
            }
            Command::Set | Command::Add => {
                let data = transform(self.patch.clone().unwrap_or_default());
                self.store.set_doc(&self.doc_path, &data)
            }
            Command::Delete | Command::Unknown => self.store.delete_doc(&self.doc_path),
        };
        result.map_err(ExecuteError::Store)
    }
}
