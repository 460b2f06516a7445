//! Typed staff model: people, employees and managers with validated
//! fields, plus the `Worker` seam for polymorphic shift descriptions.

use crate::domain::model::Record;
use crate::utils::error::{Result, RowkitError};
use crate::utils::text::normalize_name;
use std::fmt;

pub const JUNIOR_GROSS_SALARY: f64 = 25_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    name: String,
    age: u8,
}

impl Person {
    /// Normalizes the name and validates the age (0..=120).
    pub fn new(name: &str, age: u8) -> Result<Self> {
        if age > 120 {
            return Err(RowkitError::validation(format!("invalid age: {}", age)));
        }
        Ok(Self {
            name: normalize_name(name),
            age,
        })
    }

    /// Factory from a record with `name` and `age` fields.
    pub fn from_record(record: &Record) -> Result<Self> {
        let name = record
            .get_str("name")
            .ok_or_else(|| RowkitError::missing_field("name"))?;
        let age = record
            .get_i64("age")
            .ok_or_else(|| RowkitError::missing_field("age"))?;
        let age = u8::try_from(age)
            .map_err(|_| RowkitError::validation(format!("invalid age: {}", age)))?;
        Person::new(name, age)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn set_age(&mut self, age: u8) -> Result<()> {
        if age > 120 {
            return Err(RowkitError::validation(format!("invalid age: {}", age)));
        }
        self.age = age;
        Ok(())
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.age)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    person: Person,
    role: String,
    gross_salary: f64,
}

impl Employee {
    pub fn new(name: &str, age: u8, role: &str, gross_salary: f64) -> Result<Self> {
        if gross_salary < 0.0 {
            return Err(RowkitError::validation(format!(
                "invalid gross salary: {}",
                gross_salary
            )));
        }
        Ok(Self {
            person: Person::new(name, age)?,
            role: normalize_name(role),
            gross_salary,
        })
    }

    /// Factory for junior hires at the fixed entry salary.
    pub fn junior(name: &str, age: u8, role: &str) -> Result<Self> {
        Employee::new(name, age, role, JUNIOR_GROSS_SALARY)
    }

    pub fn net_from_gross(gross: f64, tax_rate: f64) -> f64 {
        gross * (1.0 - tax_rate)
    }

    pub fn person(&self) -> &Person {
        &self.person
    }

    pub fn name(&self) -> &str {
        self.person.name()
    }

    pub fn age(&self) -> u8 {
        self.person.age()
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn gross_salary(&self) -> f64 {
        self.gross_salary
    }

    pub fn set_gross_salary(&mut self, gross_salary: f64) -> Result<()> {
        if gross_salary < 0.0 {
            return Err(RowkitError::validation(format!(
                "invalid gross salary: {}",
                gross_salary
            )));
        }
        self.gross_salary = gross_salary;
        Ok(())
    }
}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} - {} € gross",
            self.person, self.role, self.gross_salary
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Manager {
    employee: Employee,
    mentees: Vec<String>,
}

impl Manager {
    pub fn new(
        name: &str,
        age: u8,
        role: &str,
        gross_salary: f64,
        mentees: &[&str],
    ) -> Result<Self> {
        let mut manager = Self {
            employee: Employee::new(name, age, role, gross_salary)?,
            mentees: Vec::new(),
        };
        for mentee in mentees {
            manager.add_mentee(mentee);
        }
        Ok(manager)
    }

    /// Adds a mentee by normalized name; duplicates are ignored.
    pub fn add_mentee(&mut self, name: &str) {
        let norm = normalize_name(name);
        if !self.mentees.contains(&norm) {
            self.mentees.push(norm);
        }
    }

    pub fn employee(&self) -> &Employee {
        &self.employee
    }

    pub fn name(&self) -> &str {
        self.employee.name()
    }

    pub fn role(&self) -> &str {
        self.employee.role()
    }

    pub fn mentees(&self) -> &[String] {
        &self.mentees
    }
}

impl fmt::Display for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (mentees: {})", self.employee, self.mentees.len())
    }
}

/// Polymorphic seam: anything that can describe its working day.
pub trait Worker {
    fn work(&self) -> String;
}

impl Worker for Person {
    fn work(&self) -> String {
        format!("{} is at work", self.name)
    }
}

impl Worker for Employee {
    fn work(&self) -> String {
        format!("{} is working as {}", self.name(), self.role)
    }
}

impl Worker for Manager {
    fn work(&self) -> String {
        format!(
            "{} coordinates as {} (mentees: {})",
            self.name(),
            self.role(),
            self.mentees.len()
        )
    }
}

/// Collects one shift description per worker.
pub fn daily_shifts(workers: &[&dyn Worker]) -> Vec<String> {
    workers.iter().map(|w| w.work()).collect()
}
