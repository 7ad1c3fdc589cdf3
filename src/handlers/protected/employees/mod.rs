// handlers/protected/employees/mod.rs - Employee CRUD handlers

pub mod create; // POST   /employees
pub mod delete; // DELETE /employees/:id
pub mod list; // GET    /employees
pub mod show; // GET    /employees/:id
pub mod update; // PUT    /employees/:id

pub use create::employee_create;
pub use delete::employee_delete;
pub use list::employee_list;
pub use show::employee_show;
pub use update::employee_update;
