//! Loan plan templates
//!
//! A plan fixes the principal, duration and flat annual interest rate for a
//! lending product; the fixed monthly installment is derived once at creation
//! time by the calculator and copied onto every loan issued from the plan.

pub mod calculator;
pub mod model;
pub mod service;

pub use calculator::{plan_terms, CalculatorError, PlanTerms};
pub use model::{CreatePlanRequest, LoanPlan};
pub use service::{PlanError, PlanService};
