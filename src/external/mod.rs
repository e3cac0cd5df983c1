mod graphql;
mod queries;

pub use graphql::GraphQLClient;
