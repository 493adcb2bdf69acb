
pub mod coordinate;
pub mod map;
pub mod person;
pub mod route;

pub trait ExampleData {
    fn example_data() -> Self;
}
