pub mod employee;

pub use employee::{Credentials, Employee, EmployeeRow, NewEmployee, PhoneRow};
